//! Exact polynomial division by leading-term elimination (grounded on
//! `division.c`'s `may_divexact`).
//!
//! Single-variable long division generalized to the canonical `Sum`-of-
//! monomials representation: repeatedly take the numerator's leading
//! term (per [`crate::ordering::cmp`]), divide it by the denominator's
//! leading term, subtract that multiple of the whole denominator from
//! the numerator, and repeat until nothing remains. If a step's leading
//! term is never divisible by the denominator's, the division is
//! inexact.

use crate::arena::Arena;
use crate::arena::node::NodeId;
use crate::error::MayError;
use crate::eval;
use crate::ordering;
use crate::poly::karatsuba;

/// Divide `numerator` by `denominator`, requiring the result to be exact.
///
/// # Errors
/// Returns [`MayError::InexactDivision`] if `denominator` does not divide
/// `numerator` evenly, and propagates [`MayError::Numeric`] from a failed
/// numeric-coefficient division (e.g. dividing by the zero polynomial).
pub fn divexact(arena: &mut Arena, numerator: NodeId, denominator: NodeId) -> Result<NodeId, MayError> {
    if eval::is_zero(arena, denominator) {
        return Err(MayError::Numeric(may_numerics::NumericError::DivisionByZero));
    }
    if eval::is_zero(arena, numerator) {
        return Ok(numerator);
    }

    let den_terms = karatsuba::terms_of(arena, denominator);
    let den_lead = leading_term(arena, &den_terms);

    let mut remainder_terms = karatsuba::terms_of(arena, numerator);
    let mut quotient_terms = Vec::new();
    let max_steps = remainder_terms.len().saturating_add(den_terms.len()).saturating_mul(4) + 16;

    for _ in 0..max_steps {
        let remainder = eval::sum(arena, remainder_terms.clone());
        if eval::is_zero(arena, remainder) {
            return Ok(eval::sum(arena, quotient_terms));
        }
        remainder_terms = karatsuba::terms_of(arena, remainder);
        let num_lead = leading_term(arena, &remainder_terms);

        let step = divide_monomial(arena, num_lead, den_lead).ok_or(MayError::InexactDivision)?;
        quotient_terms.push(step);

        let subtrahend = karatsuba::multiply(arena, step, denominator);
        let negated = negate(arena, subtrahend);
        let new_remainder = eval::sum(arena, vec![remainder, negated]);
        remainder_terms = karatsuba::terms_of(arena, new_remainder);
    }
    Err(MayError::InexactDivision)
}

/// The canonically-greatest term in `terms` (the "leading" monomial for
/// elimination purposes — any fixed total order works as long as it is
/// used consistently within one division).
fn leading_term(arena: &Arena, terms: &[NodeId]) -> NodeId {
    let mut best = terms[0];
    for &t in &terms[1..] {
        if ordering::cmp(arena, t, best) == std::cmp::Ordering::Greater {
            best = t;
        }
    }
    best
}

fn negate(arena: &mut Arena, id: NodeId) -> NodeId {
    let neg_one = eval::numeric(arena, may_numerics::Numeric::integer(-1));
    eval::product(arena, vec![neg_one, id])
}

/// Divide monomial `num` by monomial `den`, returning `None` if any
/// variable's exponent in `den` exceeds the matching exponent in `num`
/// (division would require a negative power).
fn divide_monomial(arena: &mut Arena, num: NodeId, den: NodeId) -> Option<NodeId> {
    let num_value = monomial_coefficient(arena, num);
    let den_value = monomial_coefficient(arena, den);
    let coeff_quotient = may_numerics::div(&num_value, &den_value).ok()?;

    let vars = variables_of(arena, den);
    let mut factors = Vec::new();
    for var in vars {
        let num_degree = karatsuba::degree_in(arena, num, var);
        let den_degree = karatsuba::degree_in(arena, den, var);
        if den_degree > num_degree {
            return None;
        }
        let remaining = num_degree - den_degree;
        if remaining > 0 {
            let exp = eval::numeric(arena, may_numerics::Numeric::integer(remaining));
            factors.push(eval::power(arena, var, exp));
        }
    }
    let bases = eval::product(arena, factors);
    Some(eval::factor(arena, coeff_quotient, bases))
}

/// The leading numeric coefficient of a monomial (`1` if it carries none).
fn monomial_coefficient(arena: &Arena, term: NodeId) -> may_numerics::Numeric {
    match arena.get(term).kind() {
        crate::arena::node::NodeKind::Numeric(n) | crate::arena::node::NodeKind::Factor(n, _) => n.clone(),
        _ => may_numerics::Numeric::one(),
    }
}

/// Every distinct symbol appearing (directly or inside a `Power`/
/// `Product`/`Factor`) in `term`.
pub(crate) fn variables_of(arena: &Arena, term: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    collect_variables(arena, term, &mut out);
    out
}

fn collect_variables(arena: &Arena, term: NodeId, out: &mut Vec<NodeId>) {
    match arena.get(term).kind() {
        crate::arena::node::NodeKind::String(_) => {
            let id = arena.resolve(term);
            if !out.contains(&id) {
                out.push(id);
            }
        }
        crate::arena::node::NodeKind::Power(base, _) => collect_variables(arena, *base, out),
        crate::arena::node::NodeKind::Product(factors) => {
            for &f in factors {
                collect_variables(arena, f, out);
            }
        }
        crate::arena::node::NodeKind::Factor(_, t) => collect_variables(arena, *t, out),
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::divexact;
    use crate::arena::Arena;
    use crate::error::MayError;
    use crate::eval;
    use crate::poly::karatsuba;
    use may_numerics::Numeric;

    #[test]
    fn divides_difference_of_squares_by_one_factor() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let one = eval::one(&mut arena);
        let sum = eval::sum(&mut arena, vec![x, one]);
        let neg_one = eval::numeric(&mut arena, Numeric::integer(-1));
        let neg_term = eval::product(&mut arena, vec![neg_one, one]);
        let diff = eval::sum(&mut arena, vec![x, neg_term]);
        let product = karatsuba::multiply(&mut arena, sum, diff);
        let quotient = divexact(&mut arena, product, sum).unwrap();
        assert_eq!(quotient, diff);
    }

    #[test]
    fn inexact_division_errors() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let y = eval::symbol(&mut arena, "y");
        let one = eval::one(&mut arena);
        let numerator = eval::sum(&mut arena, vec![x, one]);
        let result = divexact(&mut arena, numerator, y);
        assert_eq!(result, Err(MayError::InexactDivision));
    }

    #[test]
    fn division_by_zero_errors() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let zero = eval::zero(&mut arena);
        let result = divexact(&mut arena, x, zero);
        assert!(matches!(result, Err(MayError::Numeric(_))));
    }
}
