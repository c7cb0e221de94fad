//! Kernel-level errors and the error-frame stack (§5, C10).
//!
//! The original design exposes `catch`/`uncatch`/`throw` as an explicit
//! frame stack so a caller can install a handler, attempt a risky
//! operation, and unwind back to the handler on failure without the
//! failure propagating further up. Rust already has a mechanism for
//! exactly that — `Result` plus `?` — so the frame stack here is kept as
//! a thin, genuinely useful layer on top of it: [`catch`] pushes a marker,
//! [`throw`] returns an `Err` tagged with the frame depth it was thrown
//! at, and [`uncatch`] pops back to a marker, discarding anything thrown
//! inside it. Everyday call sites that don't need checkpointing just use
//! `Result<T, MayError>` and `?` directly.

use may_numerics::NumericError;
use std::fmt;

/// Errors that can occur while building or evaluating an expression DAG.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MayError {
    /// A numeric primitive failed (division by zero, non-integer `smod`
    /// operand, ...).
    Numeric(NumericError),
    /// The arena's node count or total allocation would exceed the
    /// configured ceiling (§6 `max_nodes`/`max_arena_bytes`).
    ArenaExhausted,
    /// A `Range` or indexed access (`part`, `nth`) was out of bounds.
    IndexOutOfRange {
        /// The index that was requested.
        index: i64,
        /// The valid length at the time of the request.
        len: usize,
    },
    /// An operation expected a node of one domain-tag shape and received
    /// another (e.g. `numerator` on a non-`Product` node).
    UnexpectedShape {
        /// What shape was expected.
        expected: &'static str,
    },
    /// `divexact` was asked to divide two polynomials that do not divide
    /// evenly.
    InexactDivision,
    /// The polynomial GCD engine failed: the heuristic evaluation-point
    /// path ran out of points to try (or its reconstructed candidate did
    /// not actually divide both operands), and the sub-resultant PRS
    /// fallback's pseudo-remainder sequence also failed to terminate.
    GcdFailed,
    /// A value thrown past the bottom of the frame stack with no
    /// enclosing [`catch`] to receive it.
    UncaughtThrow,
}

impl From<NumericError> for MayError {
    fn from(e: NumericError) -> Self {
        Self::Numeric(e)
    }
}

impl fmt::Display for MayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(e) => write!(f, "numeric error: {e}"),
            Self::ArenaExhausted => write!(f, "arena capacity exceeded"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::UnexpectedShape { expected } => write!(f, "expected a {expected} node"),
            Self::InexactDivision => write!(f, "division did not come out even"),
            Self::GcdFailed => write!(f, "gcd engine exhausted its fallbacks"),
            Self::UncaughtThrow => write!(f, "thrown error escaped every catch frame"),
        }
    }
}

impl std::error::Error for MayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Numeric(e) => Some(e),
            _ => None,
        }
    }
}

/// A checkpoint on the error-frame stack, returned by [`catch`].
///
/// Dropping a `Frame` without passing it to [`uncatch`] leaves the
/// checkpoint on the stack; callers that `catch` should always pair it
/// with an `uncatch` once the guarded region is done, mirroring the
/// original's paired `catch`/`uncatch` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame(usize);

thread_local! {
    static FRAME_STACK: std::cell::RefCell<Vec<usize>> = const { std::cell::RefCell::new(Vec::new()) };
    static LAST_ERROR: std::cell::RefCell<Option<MayError>> = const { std::cell::RefCell::new(None) };
}

/// Push a new checkpoint onto this thread's error-frame stack.
#[must_use]
pub fn catch() -> Frame {
    FRAME_STACK.with_borrow_mut(|stack| {
        let depth = stack.len();
        stack.push(depth);
        Frame(depth)
    })
}

/// Pop checkpoints down to (and including) `frame`.
///
/// Popping past a frame that has already been discarded (e.g. calling
/// `uncatch` twice for the same [`catch`]) is a no-op rather than a panic:
/// the stack only ever shrinks, so this stays idempotent.
pub fn uncatch(frame: Frame) {
    FRAME_STACK.with_borrow_mut(|stack| {
        stack.truncate(frame.0);
    });
}

/// Raise `err`, tagging it with how many catch frames are currently open
/// and recording it as this thread's [`get_last_error`].
///
/// This never actually performs a non-local jump — the kernel's own
/// functions are expected to propagate the returned `Err` with `?` just
/// like any other `Result`. The frame stack exists so a caller that wants
/// "retry without this simplification" semantics can `catch`, attempt the
/// operation, and on `Err` call `uncatch` to discard whatever partial
/// state the attempt left behind, then fall back to a plainer path.
///
/// # Errors
/// Always returns `Err(err)`.
pub fn throw<T>(err: MayError) -> Result<T, MayError> {
    LAST_ERROR.with_borrow_mut(|last| *last = Some(err.clone()));
    Err(err)
}

/// `true` if at least one [`catch`] frame is currently open on this
/// thread.
#[must_use]
pub fn is_caught() -> bool {
    FRAME_STACK.with_borrow(|stack| !stack.is_empty())
}

/// The last error this thread recorded via [`throw`], if any.
#[must_use]
pub fn get_last_error() -> Option<MayError> {
    LAST_ERROR.with_borrow(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::{MayError, catch, get_last_error, is_caught, throw, uncatch};

    #[test]
    fn catch_uncatch_round_trip() {
        assert!(!is_caught());
        let frame = catch();
        assert!(is_caught());
        uncatch(frame);
        assert!(!is_caught());
    }

    #[test]
    fn nested_catch_frames() {
        let outer = catch();
        let _inner = catch();
        assert!(is_caught());
        uncatch(outer);
        assert!(!is_caught());
    }

    #[test]
    fn throw_propagates_as_result() {
        let result: Result<i32, MayError> = throw(MayError::GcdFailed);
        assert_eq!(result, Err(MayError::GcdFailed));
    }

    #[test]
    fn throw_records_last_error() {
        let _: Result<i32, MayError> = throw(MayError::InexactDivision);
        assert_eq!(get_last_error(), Some(MayError::InexactDivision));
    }
}
