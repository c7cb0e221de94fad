//! Error type for numeric operations that cannot be carried out exactly.

use std::fmt;

/// Failure modes of the numeric layer.
///
/// These are deliberately narrower than the kernel's own `MayError`: the
/// numeric layer only ever fails for reasons intrinsic to arithmetic
/// (division by zero, a value outside the domain a caller asked for), never
/// for arena/memory reasons, which belong to the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NumericError {
    /// Division (or `gcd`/`lcm`/`smod`) by zero was requested.
    DivisionByZero,
    /// An operation that requires an integer operand (`smod`, integer
    /// `gcd`/`lcm`) was given a non-integer value.
    NotAnInteger,
    /// A comparison was requested between two values with no total order
    /// (e.g. two distinct `Complex` values outside the sign convention).
    Incomparable,
    /// The requested conversion is outside the supported numeric domain.
    CannotBeConverted(&'static str),
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::DivisionByZero => write!(f, "division by zero"),
            NumericError::NotAnInteger => write!(f, "operand is not an integer"),
            NumericError::Incomparable => write!(f, "values have no total order"),
            NumericError::CannotBeConverted(what) => {
                write!(f, "cannot be converted: {what}")
            }
        }
    }
}

impl std::error::Error for NumericError {}
