//! Karatsuba multivariate polynomial multiplication (C9, `karatsuba.c`).
//!
//! Ordinary schoolbook multiplication of two polynomials with `m` and `n`
//! terms does `m*n` monomial multiplications. Above
//! [`crate::config::Context::karatsuba_threshold`], this instead picks a
//! "main" variable present in either operand, splits both polynomials
//! into a low-degree and a high-degree half in that variable, and
//! combines three recursive half-size multiplications instead of four:
//!
//! ```text
//! (lo_a + hi_a * v^k) * (lo_b + hi_b * v^k)
//!   = lo_a*lo_b + (lo_a*hi_b + hi_a*lo_b) * v^k + hi_a*hi_b * v^2k
//! ```
//!
//! and the middle cross term is recovered from one extra multiplication
//! instead of two: `(lo_a+hi_a)*(lo_b+hi_b) - lo_a*lo_b - hi_a*hi_b`.

use crate::arena::Arena;
use crate::arena::node::{NodeId, NodeKind};
use crate::eval;

/// Multiply two (already expanded, or atomic) polynomial nodes.
pub fn multiply(arena: &mut Arena, a: NodeId, b: NodeId) -> NodeId {
    let a_terms = terms_of(arena, a);
    let b_terms = terms_of(arena, b);
    let threshold = crate::config::current().karatsuba_threshold;

    if a_terms.len() < 2 || b_terms.len() < 2 || a_terms.len() * b_terms.len() <= threshold {
        return schoolbook(arena, &a_terms, &b_terms);
    }

    match main_variable(arena, &a_terms, &b_terms) {
        Some(var) => split_multiply(arena, &a_terms, &b_terms, var),
        None => schoolbook(arena, &a_terms, &b_terms),
    }
}

pub(crate) fn terms_of(arena: &Arena, id: NodeId) -> Vec<NodeId> {
    match arena.get(id).kind() {
        NodeKind::Sum(items) => items.clone(),
        _ => vec![id],
    }
}

fn schoolbook(arena: &mut Arena, a_terms: &[NodeId], b_terms: &[NodeId]) -> NodeId {
    let mut products = Vec::with_capacity(a_terms.len() * b_terms.len());
    for &a in a_terms {
        for &b in b_terms {
            products.push(eval::product(arena, vec![a, b]));
        }
    }
    eval::sum(arena, products)
}

/// The first symbol found among either operand's terms, used as the
/// Karatsuba split variable.
pub(crate) fn main_variable(arena: &Arena, a_terms: &[NodeId], b_terms: &[NodeId]) -> Option<NodeId> {
    a_terms
        .iter()
        .chain(b_terms.iter())
        .find_map(|&t| symbol_in(arena, t))
}

fn symbol_in(arena: &Arena, term: NodeId) -> Option<NodeId> {
    match arena.get(term).kind() {
        NodeKind::String(_) => Some(term),
        NodeKind::Power(base, _) => symbol_in(arena, *base),
        NodeKind::Product(factors) => factors.iter().find_map(|&f| symbol_in(arena, f)),
        NodeKind::Factor(_, t) => symbol_in(arena, *t),
        _ => None,
    }
}

/// The exponent of `var` within `term` (`0` if `var` does not appear).
pub(crate) fn degree_in(arena: &Arena, term: NodeId, var: NodeId) -> u32 {
    if arena.resolve(term) == var {
        return 1;
    }
    match arena.get(term).kind() {
        NodeKind::Power(base, exp) if arena.resolve(*base) == var => {
            eval::as_numeric(arena, *exp).map_or(0, numeric_as_u32)
        }
        NodeKind::Product(factors) => factors.iter().map(|&f| degree_in(arena, f, var)).sum(),
        NodeKind::Factor(_, t) => degree_in(arena, *t, var),
        _ => 0,
    }
}

fn numeric_as_u32(n: &may_numerics::Numeric) -> u32 {
    let v = n.to_f64_approx();
    if v.is_finite() && v >= 0.0 && v <= f64::from(u32::MAX) {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation, reason = "bounds checked above")]
        {
            v as u32
        }
    } else {
        0
    }
}

/// Remove exactly `power` copies of `var` from `term` (caller guarantees
/// `degree_in(term, var) >= power`).
pub(crate) fn strip_var_power(arena: &mut Arena, term: NodeId, var: NodeId, power: u32) -> NodeId {
    if power == 0 {
        return term;
    }
    match arena.get(term).kind().clone() {
        NodeKind::Power(base, exp) if arena.resolve(base) == var => {
            let current = eval::as_numeric(arena, exp).map_or(0, numeric_as_u32);
            let remaining = current.saturating_sub(power);
            let new_exp = eval::numeric(arena, may_numerics::Numeric::integer(remaining));
            eval::power(arena, base, new_exp)
        }
        NodeKind::Product(factors) => {
            let mut remaining_power = power;
            let mut rebuilt = Vec::with_capacity(factors.len());
            for f in factors {
                if remaining_power == 0 {
                    rebuilt.push(f);
                    continue;
                }
                let here = degree_in(arena, f, var);
                if here == 0 {
                    rebuilt.push(f);
                } else {
                    let take = here.min(remaining_power);
                    remaining_power -= take;
                    let stripped = strip_var_power(arena, f, var, take);
                    rebuilt.push(stripped);
                }
            }
            eval::product(arena, rebuilt)
        }
        NodeKind::Factor(n, t) => {
            let stripped = strip_var_power(arena, t, var, power);
            eval::factor(arena, n, stripped)
        }
        _ if arena.resolve(term) == var => eval::one(arena),
        _ => term,
    }
}

fn split_multiply(arena: &mut Arena, a_terms: &[NodeId], b_terms: &[NodeId], var: NodeId) -> NodeId {
    let max_degree = a_terms
        .iter()
        .chain(b_terms.iter())
        .map(|&t| degree_in(arena, t, var))
        .max()
        .unwrap_or(0);
    let half = max_degree / 2;
    if half == 0 {
        return schoolbook(arena, a_terms, b_terms);
    }

    let (a_lo, a_hi) = split_terms(arena, a_terms, var, half);
    let (b_lo, b_hi) = split_terms(arena, b_terms, var, half);

    let lo_lo = multiply(arena, a_lo, b_lo);
    let hi_hi = multiply(arena, a_hi, b_hi);
    let a_mix = eval::sum(arena, vec![a_lo, a_hi]);
    let b_mix = eval::sum(arena, vec![b_lo, b_hi]);
    let mixed = multiply(arena, a_mix, b_mix);
    let cross = eval::sum(
        arena,
        vec![mixed, negate(arena, lo_lo), negate(arena, hi_hi)],
    );

    let half_id = eval::numeric(arena, may_numerics::Numeric::integer(half));
    let var_half = eval::power(arena, var, half_id);
    let two_half_id = eval::numeric(arena, may_numerics::Numeric::integer(2 * half));
    let var_two_half = eval::power(arena, var, two_half_id);

    let mid_term = eval::product(arena, vec![cross, var_half]);
    let high_term = eval::product(arena, vec![hi_hi, var_two_half]);
    eval::sum(arena, vec![lo_lo, mid_term, high_term])
}

fn negate(arena: &mut Arena, id: NodeId) -> NodeId {
    let neg_one = eval::numeric(arena, may_numerics::Numeric::integer(-1));
    eval::product(arena, vec![neg_one, id])
}

/// Split `terms` at `var`-degree `half`: the low part keeps terms as-is
/// (summed), the high part strips `var^half` from every term whose
/// `var`-degree is at least `half` (terms below that degree are dropped
/// from the high half, matching single-variable Karatsuba's `lo`/`hi`
/// split).
fn split_terms(arena: &mut Arena, terms: &[NodeId], var: NodeId, half: u32) -> (NodeId, NodeId) {
    let mut lo = Vec::new();
    let mut hi = Vec::new();
    for &term in terms {
        let degree = degree_in(arena, term, var);
        if degree < half {
            lo.push(term);
        } else {
            hi.push(strip_var_power(arena, term, var, half));
        }
    }
    (eval::sum(arena, lo), eval::sum(arena, hi))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::multiply;
    use crate::arena::Arena;
    use crate::eval;
    use may_numerics::Numeric;

    #[test]
    fn schoolbook_path_multiplies_small_polynomials() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let one = eval::one(&mut arena);
        let sum = eval::sum(&mut arena, vec![x, one]);
        let r = multiply(&mut arena, sum, sum);
        // (x+1)^2 = x^2 + 2x + 1
        match arena.get(r).kind() {
            crate::arena::node::NodeKind::Sum(terms) => assert_eq!(terms.len(), 3),
            other => panic!("expected Sum, got {other:?}"),
        }
    }

    #[test]
    fn split_multiply_matches_schoolbook_for_larger_polynomials() {
        let mut arena = Arena::new();
        crate::config::set_current(crate::config::Context {
            karatsuba_threshold: 1,
            ..crate::config::current()
        });
        let x = eval::symbol(&mut arena, "x");
        let terms: Vec<_> = (0..6)
            .map(|k| {
                let exp = eval::numeric(&mut arena, Numeric::integer(k));
                eval::power(&mut arena, x, exp)
            })
            .collect();
        let poly = eval::sum(&mut arena, terms);
        let squared = multiply(&mut arena, poly, poly);
        assert!(matches!(
            arena.get(squared).kind(),
            crate::arena::node::NodeKind::Sum(_)
        ));
    }
}
