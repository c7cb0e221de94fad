//! Numeric content and primitive part (grounded on `collect.c`'s
//! coefficient-gcd pass).
//!
//! The "content" of a polynomial is the GCD of every numeric coefficient
//! appearing in its (already canonical) `Sum` of monomials; the
//! "primitive part" is what remains after dividing that content back out
//! of every term. Both are used by [`crate::poly::gcd`] to keep the
//! pseudo-remainder sequence from growing unbounded numeric coefficients.

use crate::arena::Arena;
use crate::arena::node::{NodeId, NodeKind};
use crate::eval;
use may_numerics::Numeric;

/// The GCD of every numeric coefficient in `id`'s term list.
///
/// `id` need not be a `Sum`: an atomic term's content is its own leading
/// coefficient, and any node with no numeric coefficient at all (a bare
/// symbol, say) has content `1`.
#[must_use]
pub fn content(arena: &Arena, id: NodeId) -> Numeric {
    let terms = crate::poly::karatsuba::terms_of(arena, id);
    let mut acc: Option<Numeric> = None;
    for term in terms {
        let coeff = term_coefficient(arena, term);
        acc = Some(match acc {
            None => coeff,
            Some(running) => may_numerics::gcd(&running, &coeff).unwrap_or(Numeric::one()),
        });
    }
    acc.unwrap_or_else(Numeric::one)
}

/// The leading numeric coefficient of a single monomial (`1` if the term
/// carries no explicit numeric factor).
pub(crate) fn term_coefficient(arena: &Arena, term: NodeId) -> Numeric {
    match arena.get(term).kind() {
        NodeKind::Numeric(n) | NodeKind::Factor(n, _) => n.clone(),
        _ => Numeric::one(),
    }
}

/// Divide `content(id)` back out of every term of `id`.
///
/// Returns `id` unchanged if its content is `1` (the overwhelmingly
/// common case once a polynomial is already primitive).
#[must_use]
pub fn primpart(arena: &mut Arena, id: NodeId) -> NodeId {
    let c = content(arena, id);
    if c.is_one() {
        return id;
    }
    let terms = crate::poly::karatsuba::terms_of(arena, id);
    let divided: Vec<NodeId> = terms
        .into_iter()
        .map(|term| divide_term_by(arena, term, &c))
        .collect();
    eval::sum(arena, divided)
}

/// Divide a single monomial's numeric coefficient by `c` (assumed to
/// divide it exactly, as guaranteed by `c` being a GCD of all of them).
fn divide_term_by(arena: &mut Arena, term: NodeId, c: &Numeric) -> NodeId {
    match arena.get(term).kind().clone() {
        NodeKind::Numeric(n) => {
            let quotient = may_numerics::div(&n, c).unwrap_or(n);
            eval::numeric(arena, quotient)
        }
        NodeKind::Factor(n, t) => {
            let quotient = may_numerics::div(&n, c).unwrap_or(n);
            eval::factor(arena, quotient, t)
        }
        _ => {
            let inv = may_numerics::div(&Numeric::one(), c).unwrap_or_else(|_| Numeric::one());
            eval::factor(arena, inv, term)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::{content, primpart};
    use crate::arena::Arena;
    use crate::eval;
    use may_numerics::Numeric;

    #[test]
    fn content_of_scaled_polynomial_is_the_common_factor() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let six = eval::numeric(&mut arena, Numeric::integer(6));
        let four = eval::numeric(&mut arena, Numeric::integer(4));
        let term_a = eval::product(&mut arena, vec![six, x]);
        let poly = eval::sum(&mut arena, vec![term_a, four]);
        let c = content(&arena, poly);
        assert_eq!(c, Numeric::integer(2));
    }

    #[test]
    fn primpart_divides_out_the_content() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let six = eval::numeric(&mut arena, Numeric::integer(6));
        let four = eval::numeric(&mut arena, Numeric::integer(4));
        let term_a = eval::product(&mut arena, vec![six, x]);
        let poly = eval::sum(&mut arena, vec![term_a, four]);
        let prim = primpart(&mut arena, poly);
        assert_eq!(content(&arena, prim), Numeric::one());
    }

    #[test]
    fn primpart_of_already_primitive_polynomial_is_unchanged() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let one = eval::one(&mut arena);
        let poly = eval::sum(&mut arena, vec![x, one]);
        let prim = primpart(&mut arena, poly);
        assert_eq!(prim, poly);
    }
}
