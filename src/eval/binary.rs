//! `Mod`/`Gcd` binary-function canonicalization (§4.4.5).

use crate::arena::Arena;
use crate::arena::node::{BinaryOp, NodeId, NodeKind};
use crate::error::MayError;

/// Build the canonical `op(lhs, rhs)`.
///
/// If both operands are numeric, the operation is folded immediately
/// through the matching `may_numerics` primitive; a genuine arithmetic
/// failure there (division/modulus by zero) propagates as an error rather
/// than silently falling back to a symbolic node, since the operands
/// *were* numeric and the failure is real. Non-numeric operands always
/// fall back to a symbolic node.
///
/// # Errors
/// Propagates [`may_numerics::NumericError`] (wrapped in [`MayError`])
/// from a folding attempt on two numeric operands.
pub fn binary(arena: &mut Arena, op: BinaryOp, lhs: NodeId, rhs: NodeId) -> Result<NodeId, MayError> {
    if let (Some(a), Some(b)) = (super::as_numeric(arena, lhs), super::as_numeric(arena, rhs)) {
        let (a, b) = (a.clone(), b.clone());
        let folded = match op {
            BinaryOp::Mod => may_numerics::smod(&a, &b),
            BinaryOp::Gcd => may_numerics::gcd(&a, &b),
        };
        return match folded {
            Ok(result) => Ok(super::numeric(arena, result)),
            Err(may_numerics::NumericError::NotAnInteger) => {
                Ok(arena.intern(NodeKind::BinaryFunc(op, lhs, rhs)))
            }
            Err(other) => Err(MayError::Numeric(other)),
        };
    }
    Ok(arena.intern(NodeKind::BinaryFunc(op, lhs, rhs)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::binary;
    use crate::arena::Arena;
    use crate::arena::node::BinaryOp;
    use crate::error::MayError;
    use crate::eval;
    use may_numerics::Numeric;

    #[test]
    fn folds_integer_mod() {
        let mut arena = Arena::new();
        let a = eval::numeric(&mut arena, Numeric::integer(7));
        let b = eval::numeric(&mut arena, Numeric::integer(4));
        let r = binary(&mut arena, BinaryOp::Mod, a, b).unwrap();
        assert!(eval::as_numeric(&arena, r).is_some_and(|n| n == &Numeric::integer(-1)));
    }

    #[test]
    fn mod_by_zero_errors() {
        let mut arena = Arena::new();
        let a = eval::numeric(&mut arena, Numeric::integer(7));
        let zero = eval::zero(&mut arena);
        let r = binary(&mut arena, BinaryOp::Mod, a, zero);
        assert_eq!(r, Err(MayError::Numeric(may_numerics::NumericError::DivisionByZero)));
    }

    #[test]
    fn gcd_of_symbols_stays_symbolic() {
        let mut arena = Arena::new();
        let x = eval::symbol(&mut arena, "x");
        let y = eval::symbol(&mut arena, "y");
        let r = binary(&mut arena, BinaryOp::Gcd, x, y).unwrap();
        assert!(matches!(
            arena.get(r).kind(),
            crate::arena::node::NodeKind::BinaryFunc(BinaryOp::Gcd, ..)
        ));
    }
}
