//! `Sum` canonicalization (§4.4.1-§4.4.2): flatten, fold numerics, merge
//! like terms, sort.

use crate::arena::Arena;
use crate::arena::node::{NodeId, NodeKind};
use crate::ordering;
use may_numerics::Numeric;
use rustc_hash::FxHashMap;

/// Build the canonical sum of `terms`.
///
/// - Nested `Sum`s are flattened (associativity).
/// - All numeric leaves are folded into one numeric addend.
/// - Any two terms that share a non-numeric "base" (a term with its
///   numeric coefficient split off — `3*x` and `x` share base `x`) are
///   merged by adding their coefficients.
/// - Operands are left in [`ordering::cmp`] order.
/// - A single surviving addend is returned directly rather than wrapped
///   in a one-element `Sum`; zero addends collapse to the zero leaf.
pub fn sum(arena: &mut Arena, terms: Vec<NodeId>) -> NodeId {
    let mut flat = Vec::with_capacity(terms.len());
    flatten(arena, terms, &mut flat);

    let mut constant = Numeric::zero();
    let mut bases: Vec<NodeId> = Vec::new();
    let mut coeffs: FxHashMap<NodeId, Numeric> = FxHashMap::default();

    for term in flat {
        match split_term(arena, term) {
            (coeff, None) => constant = may_numerics::add(&constant, &coeff),
            (coeff, Some(base)) => {
                coeffs
                    .entry(base)
                    .and_modify(|c| *c = may_numerics::add(c, &coeff))
                    .or_insert_with(|| {
                        bases.push(base);
                        coeff
                    });
            }
        }
    }

    let mut rebuilt: Vec<NodeId> = bases
        .into_iter()
        .filter_map(|base| {
            let coeff = coeffs.remove(&base)?;
            if coeff.is_zero() {
                return None;
            }
            Some(rebuild_term(arena, coeff, base))
        })
        .collect();

    if !constant.is_zero() || rebuilt.is_empty() {
        rebuilt.push(super::numeric(arena, constant));
    }

    rebuilt.sort_by(|&a, &b| ordering::cmp(arena, a, b));

    match rebuilt.len() {
        0 => super::zero(arena),
        1 => rebuilt[0],
        _ => arena.intern(NodeKind::Sum(rebuilt)),
    }
}

fn flatten(arena: &Arena, terms: Vec<NodeId>, out: &mut Vec<NodeId>) {
    for term in terms {
        let resolved = arena.resolve(term);
        if let NodeKind::Sum(inner) = arena.get(resolved).kind() {
            flatten(arena, inner.clone(), out);
        } else {
            out.push(resolved);
        }
    }
}

/// Split a term into `(coefficient, base)`: a pure numeric term has no
/// base (`None`); a `Factor(num, base)` splits apart directly (§3); a
/// `Product` never carries a numeric leader of its own (that invariant
/// is what `Factor` exists to enforce), so anything else has an implicit
/// coefficient of `1`.
fn split_term(arena: &mut Arena, term: NodeId) -> (Numeric, Option<NodeId>) {
    match arena.get(term).kind().clone() {
        NodeKind::Numeric(n) => (n, None),
        NodeKind::Factor(n, base) => (n, Some(base)),
        _ => (Numeric::one(), Some(term)),
    }
}

fn rebuild_term(arena: &mut Arena, coeff: Numeric, base: NodeId) -> NodeId {
    super::factor(arena, coeff, base)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::sum;
    use crate::arena::Arena;
    use crate::arena::node::NodeKind;
    use crate::eval;
    use may_numerics::Numeric;

    #[test]
    fn folds_numeric_constants() {
        let mut arena = Arena::new();
        let a = eval::numeric(&mut arena, Numeric::integer(2));
        let b = eval::numeric(&mut arena, Numeric::integer(3));
        let s = sum(&mut arena, vec![a, b]);
        assert!(eval::as_numeric(&arena, s).is_some_and(|n| n == &Numeric::integer(5)));
    }

    #[test]
    fn merges_like_terms() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let two = eval::numeric(&mut arena, Numeric::integer(2));
        let three = eval::numeric(&mut arena, Numeric::integer(3));
        let two_x = crate::eval::product(&mut arena, vec![two, x]);
        let three_x = crate::eval::product(&mut arena, vec![three, x]);
        let s = sum(&mut arena, vec![two_x, three_x]);
        // 2x + 3x = 5x, a Factor(5, x)
        match arena.get(s).kind() {
            NodeKind::Factor(n, base) => {
                assert_eq!(n, &Numeric::integer(5));
                assert_eq!(*base, x);
            }
            other => panic!("expected Factor, got {other:?}"),
        }
    }

    #[test]
    fn cancelling_terms_vanish() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let neg_x = {
            let neg_one = eval::numeric(&mut arena, Numeric::integer(-1));
            crate::eval::product(&mut arena, vec![neg_one, x])
        };
        let s = sum(&mut arena, vec![x, neg_x]);
        assert!(eval::is_zero(&arena, s));
    }
}
