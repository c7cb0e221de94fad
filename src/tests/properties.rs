//! Property tests for §8's universal canonicalization invariants.
//!
//! Each node graph here is built fresh inside its own [`Arena`] per
//! quickcheck iteration; wrapping every input in a bounded range keeps
//! the evaluator's numeric folding fast without needing its own
//! `Arbitrary` impl for [`NodeId`] (node identity is meaningless across
//! arenas, so there is nothing sensible to shrink towards).

#![allow(clippy::unwrap_used, clippy::panic, reason = "test module")]

use crate::arena::Arena;
use crate::arena::node::NodeId;
use crate::eval;
use crate::ordering;
use may_numerics::Numeric;
use quickcheck::quickcheck;

fn int(arena: &mut Arena, n: i32) -> NodeId {
    eval::numeric(arena, Numeric::integer(i64::from(n)))
}

fn negate(arena: &mut Arena, id: NodeId) -> NodeId {
    let neg_one = eval::numeric(arena, Numeric::integer(-1));
    eval::product(arena, vec![neg_one, id])
}

quickcheck! {
    /// Invariant 1: `eval(eval(x)) = eval(x)` structurally.
    fn idempotence(a: i32, b: i32) -> bool {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let an = int(&mut arena, a);
        let bn = int(&mut arena, b);
        let term = eval::product(&mut arena, vec![an, x]);
        let once = eval::sum(&mut arena, vec![term, bn]);
        let twice = eval::sum(&mut arena, vec![once]);
        once == twice
    }

    /// Invariant 2: canonical form of a Sum does not depend on
    /// construction order.
    fn sum_order_independence(a: i32, b: i32, c: i32) -> bool {
        let mut arena = Arena::new();
        let an = int(&mut arena, a);
        let bn = int(&mut arena, b);
        let cn = int(&mut arena, c);
        let forward = eval::sum(&mut arena, vec![an, bn, cn]);
        let reversed = eval::sum(&mut arena, vec![cn, bn, an]);
        forward == reversed
    }

    /// Invariant 2 (Product side).
    fn product_order_independence(a: i32, b: i32, c: i32) -> bool {
        let mut arena = Arena::new();
        let an = int(&mut arena, a);
        let bn = int(&mut arena, b);
        let cn = int(&mut arena, c);
        let forward = eval::product(&mut arena, vec![an, bn, cn]);
        let reversed = eval::product(&mut arena, vec![cn, bn, an]);
        forward == reversed
    }

    /// Invariant 3: identical nodes always share a hash (guaranteed
    /// structurally by hash-consing, exercised here through two
    /// differently-ordered constructions of the same Sum).
    fn hash_respects_identity(a: i32, b: i32) -> bool {
        let mut arena = Arena::new();
        let an = int(&mut arena, a);
        let bn = int(&mut arena, b);
        let x = eval::symbol(&mut arena, "x");
        let lhs = eval::sum(&mut arena, vec![an, eval::product(&mut arena, vec![bn, x])]);
        let rhs = eval::sum(&mut arena, vec![eval::product(&mut arena, vec![bn, x]), an]);
        !ordering::identical(&arena, lhs, rhs) || arena.get(lhs).hash() == arena.get(rhs).hash()
    }

    /// Invariant 6: `eval((a-b)/(b-a)) = -1` whenever `a != b`.
    fn sign_canonicalization(a: i16, b: i16) -> bool {
        if a == b {
            return true;
        }
        let mut arena = Arena::new();
        let an = int(&mut arena, i32::from(a));
        let bn = int(&mut arena, i32::from(b));
        let num = eval::sum(&mut arena, vec![an, negate(&mut arena, bn)]);
        let den = eval::sum(&mut arena, vec![bn, negate(&mut arena, an)]);
        let neg_one_exp = int(&mut arena, -1);
        let recip = eval::power(&mut arena, den, neg_one_exp);
        let quotient = eval::product(&mut arena, vec![num, recip]);
        eval::as_numeric(&arena, quotient) == Some(&Numeric::integer(-1))
    }

    /// Invariant 7: `eval(k*(x+y)) = eval(k*x + k*y)` for integer `k`.
    fn integer_scalar_distributes_over_sum(k: i16) -> bool {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let y = eval::symbol(&mut arena, "y");
        let kn = int(&mut arena, i32::from(k));
        let sum_xy = eval::sum(&mut arena, vec![x, y]);
        let lhs = eval::product(&mut arena, vec![kn, sum_xy]);
        let lhs = crate::poly::expand(&mut arena, lhs);

        let kx = eval::product(&mut arena, vec![kn, x]);
        let ky = eval::product(&mut arena, vec![kn, y]);
        let rhs = eval::sum(&mut arena, vec![kx, ky]);

        lhs == rhs
    }
}

#[cfg(test)]
mod scenarios {
    use super::*;
    use crate::arena::node::NodeKind;

    #[test]
    fn sum_of_like_terms_merges_into_one_factor() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let two = int(&mut arena, 2);
        let three = int(&mut arena, 3);
        let a = eval::product(&mut arena, vec![two, x]);
        let b = eval::product(&mut arena, vec![three, x]);
        let r = eval::sum(&mut arena, vec![a, b]);
        match arena.get(r).kind() {
            NodeKind::Factor(n, base) => {
                assert_eq!(n, &Numeric::integer(5));
                assert_eq!(*base, x);
            }
            other => panic!("expected Factor(5, x), got {other:?}"),
        }
    }

    #[test]
    fn power_of_sum_to_zero_is_one() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let y = eval::symbol(&mut arena, "y");
        let sum = eval::sum(&mut arena, vec![x, y]);
        let zero = eval::zero(&mut arena);
        let r = eval::power(&mut arena, sum, zero);
        assert!(eval::is_one(&arena, r));
    }
}
