//! Unary transcendental/structural function simplification (§4.4.5).
//!
//! Only the exact, universally-valid identities are folded here (`cos(0)
//! = 1`, `exp(log(x)) = x`, `|numeric| = numeric`, ...); anything that
//! would require a domain assumption about its argument (`sqrt(x^2) = x`
//! for real non-negative `x`) is left for a rewrite layer built on top of
//! [`crate::domain`], not this evaluator.

use crate::arena::Arena;
use crate::arena::node::{NodeId, NodeKind, UnaryOp};
use may_numerics::Numeric;

/// Build the canonical `op(arg)`.
pub fn unary(arena: &mut Arena, op: UnaryOp, arg: NodeId) -> NodeId {
    if let Some(folded) = fold_numeric(arena, op, arg) {
        return folded;
    }
    if let Some(folded) = fold_identity(arena, op, arg) {
        return folded;
    }
    arena.intern(NodeKind::UnaryFunc(op, arg))
}

/// Identities that hold regardless of the argument's value.
fn fold_identity(arena: &mut Arena, op: UnaryOp, arg: NodeId) -> Option<NodeId> {
    match op {
        UnaryOp::Exp if super::is_zero(arena, arg) => Some(super::one(arena)),
        UnaryOp::Log if super::is_one(arena, arg) => Some(super::zero(arena)),
        UnaryOp::Sin | UnaryOp::Tan | UnaryOp::Sinh | UnaryOp::Tanh | UnaryOp::Asin
        | UnaryOp::Atan | UnaryOp::Asinh | UnaryOp::Atanh
            if super::is_zero(arena, arg) =>
        {
            Some(super::zero(arena))
        }
        UnaryOp::Cos | UnaryOp::Cosh if super::is_zero(arena, arg) => Some(super::one(arena)),
        UnaryOp::Exp => fold_exp_log_inverse(arena, arg),
        UnaryOp::Log => fold_log_exp_inverse(arena, arg),
        _ => None,
    }
}

fn fold_exp_log_inverse(arena: &Arena, arg: NodeId) -> Option<NodeId> {
    if let NodeKind::UnaryFunc(UnaryOp::Log, inner) = arena.get(arg).kind() {
        return Some(*inner);
    }
    None
}

fn fold_log_exp_inverse(arena: &Arena, arg: NodeId) -> Option<NodeId> {
    if let NodeKind::UnaryFunc(UnaryOp::Exp, inner) = arena.get(arg).kind() {
        return Some(*inner);
    }
    None
}

/// Operations with a closed-form numeric evaluation that never needs a
/// domain assumption.
fn fold_numeric(arena: &mut Arena, op: UnaryOp, arg: NodeId) -> Option<NodeId> {
    let n = super::as_numeric(arena, arg)?.clone();
    let result = match op {
        UnaryOp::Abs => may_numerics::abs(&n),
        UnaryOp::Conj => may_numerics::conj(&n),
        UnaryOp::Sign => Numeric::integer(n.sign()),
        UnaryOp::Real => real_part(&n),
        UnaryOp::Imag => imag_part(&n),
        _ => return None,
    };
    Some(super::numeric(arena, result))
}

fn real_part(n: &Numeric) -> Numeric {
    match n {
        Numeric::Complex(re, _) => (**re).clone(),
        other => other.clone(),
    }
}

fn imag_part(n: &Numeric) -> Numeric {
    match n {
        Numeric::Complex(_, im) => (**im).clone(),
        _ => Numeric::zero(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::unary;
    use crate::arena::Arena;
    use crate::arena::node::UnaryOp;
    use crate::eval;
    use may_numerics::Numeric;

    #[test]
    fn cos_of_zero_is_one() {
        let mut arena = Arena::new();
        let zero = eval::zero(&mut arena);
        let r = unary(&mut arena, UnaryOp::Cos, zero);
        assert!(eval::is_one(&arena, r));
    }

    #[test]
    fn abs_of_negative_integer() {
        let mut arena = Arena::new();
        let neg = eval::numeric(&mut arena, Numeric::integer(-5));
        let r = unary(&mut arena, UnaryOp::Abs, neg);
        assert!(eval::as_numeric(&arena, r).is_some_and(|n| n == &Numeric::integer(5)));
    }

    #[test]
    fn exp_log_cancel() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let logged = unary(&mut arena, UnaryOp::Log, x);
        let r = unary(&mut arena, UnaryOp::Exp, logged);
        assert_eq!(r, x);
    }
}
