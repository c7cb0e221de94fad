//! `Power` canonicalization (§4.4.4).

use crate::arena::Arena;
use crate::arena::node::{NodeId, NodeKind};

/// Build the canonical `base ^ exponent`.
///
/// - `base^0 = 1` (even for `base = 0`, matching the usual symbolic
///   convention rather than raising an error).
/// - `base^1 = base`.
/// - `0^e = 0` for any nonzero numeric `e` with positive sign.
/// - `1^e = 1`.
/// - Two numeric operands are folded through `may_numerics::pow` when the
///   result is exact; otherwise the node stays symbolic.
/// - `(b^e1)^e2` collapses to `b^(e1*e2)`.
pub fn power(arena: &mut Arena, base: NodeId, exponent: NodeId) -> NodeId {
    if super::is_zero(arena, exponent) {
        return super::one(arena);
    }
    if super::is_one(arena, exponent) {
        return base;
    }
    if super::is_one(arena, base) {
        return base;
    }
    if super::is_zero(arena, base) {
        if let Some(e) = super::as_numeric(arena, exponent) {
            if e.is_pos() {
                return super::zero(arena);
            }
        }
    }
    if let (Some(b), Some(e)) = (super::as_numeric(arena, base), super::as_numeric(arena, exponent)) {
        if let Some(result) = may_numerics::pow(b, e) {
            return super::numeric(arena, result);
        }
    }
    if let NodeKind::Power(inner_base, inner_exp) = arena.get(base).kind() {
        let (inner_base, inner_exp) = (*inner_base, *inner_exp);
        let combined_exp = super::product(arena, vec![inner_exp, exponent]);
        return power(arena, inner_base, combined_exp);
    }
    arena.intern(NodeKind::Power(base, exponent))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::power;
    use crate::arena::Arena;
    use crate::eval;
    use may_numerics::Numeric;

    #[test]
    fn zero_exponent_is_one() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let zero = eval::zero(&mut arena);
        let p = power(&mut arena, x, zero);
        assert!(eval::is_one(&arena, p));
    }

    #[test]
    fn folds_numeric_power() {
        let mut arena = Arena::new();
        let two = eval::numeric(&mut arena, Numeric::integer(2));
        let three = eval::numeric(&mut arena, Numeric::integer(3));
        let p = power(&mut arena, two, three);
        assert!(eval::as_numeric(&arena, p).is_some_and(|n| n == &Numeric::integer(8)));
    }

    #[test]
    fn nested_power_collapses() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let two = eval::numeric(&mut arena, Numeric::integer(2));
        let three = eval::numeric(&mut arena, Numeric::integer(3));
        let inner = power(&mut arena, x, two);
        let outer = power(&mut arena, inner, three);
        match arena.get(outer).kind() {
            crate::arena::node::NodeKind::Power(base, exp) => {
                assert_eq!(*base, x);
                assert!(eval::as_numeric(&arena, *exp).is_some_and(|n| n == &Numeric::integer(6)));
            }
            other => panic!("expected Power, got {other:?}"),
        }
    }
}
