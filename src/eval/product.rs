//! `Product` canonicalization (§4.4.1, §4.4.3): flatten, fold numerics,
//! merge like bases by summing exponents, sort.

use crate::arena::Arena;
use crate::arena::node::{NodeId, NodeKind};
use crate::ordering;
use may_numerics::Numeric;
use rustc_hash::FxHashMap;

/// Build the canonical product of `factors`.
///
/// - Nested `Product`s are flattened; a `Factor(num, term)` factor
///   contributes `num` to the running coefficient and re-flattens `term`
///   (§3: a `Product` never carries a numeric leader of its own, so the
///   coefficient is always pulled out here rather than left in place).
/// - All numeric leaves are folded into one numeric coefficient.
/// - A zero coefficient short-circuits to the zero leaf.
/// - Any two factors that share a base (`x` and `x^2` both have base `x`)
///   are merged by adding their exponents; an exponent of zero drops the
///   factor, an exponent of one leaves the base un-wrapped.
/// - The non-numeric bases are left in [`ordering::cmp`] order and
///   wrapped in a [`super::factor`] with the folded coefficient, so the
///   `Product` node itself (if one survives) never holds a numeric
///   argument.
pub fn product(arena: &mut Arena, factors: Vec<NodeId>) -> NodeId {
    let mut coeff = Numeric::one();
    let mut flat = Vec::with_capacity(factors.len());
    flatten(arena, factors, &mut coeff, &mut flat);

    let mut bases: Vec<NodeId> = Vec::new();
    let mut exponents: FxHashMap<NodeId, NodeId> = FxHashMap::default();

    for factor in flat {
        let (base, exp) = split_factor(arena, factor);
        exponents
            .entry(base)
            .and_modify(|e| *e = super::sum(arena, vec![*e, exp]))
            .or_insert_with(|| {
                bases.push(base);
                exp
            });
    }

    if coeff.is_zero() {
        return super::zero(arena);
    }

    let mut rebuilt: Vec<NodeId> = bases
        .into_iter()
        .filter_map(|base| {
            let exp = exponents.remove(&base)?;
            if super::is_zero(arena, exp) {
                return None;
            }
            Some(super::power(arena, base, exp))
        })
        .collect();
    rebuilt.sort_by(|&a, &b| ordering::cmp(arena, a, b));

    let bases_product = match rebuilt.len() {
        0 => super::one(arena),
        1 => rebuilt[0],
        _ => arena.intern(NodeKind::Product(rebuilt)),
    };

    super::factor(arena, coeff, bases_product)
}

/// Flatten `factors` into non-numeric, non-`Factor` atoms, pulling every
/// numeric leaf and every `Factor` coefficient out into `coeff` along
/// the way.
fn flatten(arena: &Arena, factors: Vec<NodeId>, coeff: &mut Numeric, out: &mut Vec<NodeId>) {
    for factor in factors {
        let resolved = arena.resolve(factor);
        match arena.get(resolved).kind() {
            NodeKind::Product(inner) => flatten(arena, inner.clone(), coeff, out),
            NodeKind::Numeric(n) => *coeff = may_numerics::mul(coeff, n),
            NodeKind::Factor(n, term) => {
                *coeff = may_numerics::mul(coeff, n);
                flatten(arena, vec![*term], coeff, out);
            }
            _ => out.push(resolved),
        }
    }
}

/// Split a factor into `(base, exponent)` form: a `Power` node yields its
/// own `(base, exponent)`; anything else is `(factor, 1)`.
fn split_factor(arena: &mut Arena, factor: NodeId) -> (NodeId, NodeId) {
    match arena.get(factor).kind().clone() {
        NodeKind::Power(base, exp) => (base, exp),
        _ => {
            let one = super::one(arena);
            (factor, one)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::product;
    use crate::arena::Arena;
    use crate::eval;
    use may_numerics::Numeric;

    #[test]
    fn folds_numeric_factors() {
        let mut arena = Arena::new();
        let a = eval::numeric(&mut arena, Numeric::integer(2));
        let b = eval::numeric(&mut arena, Numeric::integer(3));
        let p = product(&mut arena, vec![a, b]);
        assert!(eval::as_numeric(&arena, p).is_some_and(|n| n == &Numeric::integer(6)));
    }

    #[test]
    fn zero_factor_annihilates() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let zero = eval::zero(&mut arena);
        let p = product(&mut arena, vec![x, zero]);
        assert!(eval::is_zero(&arena, p));
    }

    #[test]
    fn merges_repeated_base_into_power() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let p = product(&mut arena, vec![x, x]);
        match arena.get(p).kind() {
            crate::arena::node::NodeKind::Power(base, exp) => {
                assert_eq!(*base, x);
                assert!(eval::as_numeric(&arena, *exp).is_some_and(|n| n == &Numeric::integer(2)));
            }
            other => panic!("expected Power, got {other:?}"),
        }
    }
}
