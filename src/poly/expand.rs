//! Expansion: rewrite a node so every `Product` has been distributed over
//! any `Sum` operand and every `Power` of a `Sum` has been multiplied out
//! (C7, §4.4 "Expand").

use crate::arena::Arena;
use crate::arena::node::{NodeId, NodeKind};
use crate::eval;
use crate::poly::karatsuba;

/// Recursively expand `id`: distribute products over sums and multiply
/// out integer powers of sums. Nodes with no sub-structure relevant to
/// expansion (numeric/symbol leaves, `Range`, `Diff`, ...) are returned
/// unchanged; function nodes have their arguments expanded but the
/// function itself is left symbolic.
pub fn expand(arena: &mut Arena, id: NodeId) -> NodeId {
    match arena.get(id).kind().clone() {
        NodeKind::Sum(terms) => {
            let expanded: Vec<NodeId> = terms.iter().map(|&t| expand(arena, t)).collect();
            eval::sum(arena, expanded)
        }
        NodeKind::Product(factors) => {
            let expanded: Vec<NodeId> = factors.iter().map(|&f| expand(arena, f)).collect();
            distribute(arena, &expanded)
        }
        NodeKind::Factor(n, term) => {
            let expanded = expand(arena, term);
            let coeff = eval::numeric(arena, n);
            distribute(arena, &[coeff, expanded])
        }
        NodeKind::Power(base, exp) => {
            let base = expand(arena, base);
            if let Some(count) = small_nonneg_exponent(arena, exp) {
                return expand_power(arena, base, count);
            }
            eval::power(arena, base, exp)
        }
        NodeKind::UnaryFunc(op, arg) => {
            let arg = expand(arena, arg);
            eval::unary(arena, op, arg)
        }
        NodeKind::BinaryFunc(op, a, b) => {
            let a = expand(arena, a);
            let b = expand(arena, b);
            eval::binary(arena, op, a, b).unwrap_or_else(|_| arena.intern(NodeKind::BinaryFunc(op, a, b)))
        }
        _ => id,
    }
}

fn small_nonneg_exponent(arena: &Arena, exp: NodeId) -> Option<u32> {
    let n = eval::as_numeric(arena, exp)?;
    if !n.is_integer() || n.is_neg() {
        return None;
    }
    let value = n.to_f64_approx();
    if value.is_finite() && value <= f64::from(u32::MAX) {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "bounds already checked above"
        )]
        {
            Some(value as u32)
        }
    } else {
        None
    }
}

/// Multiply `base` by itself `count` times via repeated Karatsuba
/// multiplication (binary exponentiation so a large count only costs
/// `O(log count)` multiplies).
fn expand_power(arena: &mut Arena, base: NodeId, count: u32) -> NodeId {
    if count == 0 {
        return eval::one(arena);
    }
    let mut acc = eval::one(arena);
    let mut b = base;
    let mut n = count;
    while n > 0 {
        if n & 1 == 1 {
            acc = karatsuba::multiply(arena, acc, b);
        }
        n >>= 1;
        if n > 0 {
            b = karatsuba::multiply(arena, b, b);
        }
    }
    acc
}

/// Distribute a list of already-expanded factors against each other,
/// left to right.
fn distribute(arena: &mut Arena, factors: &[NodeId]) -> NodeId {
    let mut acc = eval::one(arena);
    for &factor in factors {
        acc = karatsuba::multiply(arena, acc, factor);
    }
    acc
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::expand;
    use crate::arena::Arena;
    use crate::eval;
    use may_numerics::Numeric;

    #[test]
    fn distributes_simple_product_over_sum() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let y = eval::symbol(&mut arena, "y");
        let sum = eval::sum(&mut arena, vec![x, y]);
        let product = eval::product(&mut arena, vec![x, sum]);
        let expanded = expand(&mut arena, product);
        // x*(x+y) = x^2 + x*y
        match arena.get(expanded).kind() {
            crate::arena::node::NodeKind::Sum(terms) => assert_eq!(terms.len(), 2),
            other => panic!("expected Sum, got {other:?}"),
        }
    }

    #[test]
    fn expands_square_of_binomial() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let one = eval::one(&mut arena);
        let sum = eval::sum(&mut arena, vec![x, one]);
        let two = eval::numeric(&mut arena, Numeric::integer(2));
        let squared = eval::power(&mut arena, sum, two);
        let expanded = expand(&mut arena, squared);
        // (x+1)^2 = x^2 + 2x + 1, three terms
        match arena.get(expanded).kind() {
            crate::arena::node::NodeKind::Sum(terms) => assert_eq!(terms.len(), 3),
            other => panic!("expected Sum, got {other:?}"),
        }
    }
}
