#![forbid(unsafe_code)]
//! Arbitrary-precision numeric core for the MAY expression kernel.
//!
//! This crate is the `C2 Numerics wrapper` of the kernel design: a thin,
//! uniform interface over bignum integer / rational / multiprecision float /
//! complex values. The kernel (the sibling `may-kernel` crate) never touches
//! `rug` directly — it only ever sees [`Numeric`] and the free functions in
//! [`ops`].
//!
//! Every numeric primitive that can fail to be *exact* (`pow` of a
//! non-perfect root, comparing incomparable complexes) returns a `Result`
//! or `Option` rather than panicking; the kernel decides whether a failure
//! means "stay symbolic" or "propagate a [`MayError`](may-kernel's error
//! type)".

mod dummy;
mod error;
mod ops;

pub use dummy::Dest;
pub use error::NumericError;
pub use ops::{
    abs, add, cmp, conj, div, gcd, lcm, max, min, mul, neg, num_simplify, pow, rationalize_float,
    smod, sub,
};

use rug::{Float, Integer, Rational};
use std::cmp::Ordering;

/// Working precision (bits of mantissa) used whenever a fresh [`Float`] is
/// constructed without an explicit precision request. Mirrors the "working
/// precision" kernel configuration knob (§6); the kernel's `Context`
/// overrides this on a per-thread basis by passing an explicit precision to
/// the constructors below instead of relying on the default.
pub const DEFAULT_PRECISION: u32 = 256;

/// A single opaque numeric value: one of the four leaves of the kernel's
/// numeric domain (§3: Integer, Rational, Float, Complex).
///
/// `Rational` is only ever constructed in lowest terms with denominator
/// `> 1` (denominator `1` is immediately collapsed to `Integer` by
/// [`num_simplify`]); `Complex` never nests (`re`/`im` are always one of the
/// other three variants), matching "re, im are both non-Complex numeric
/// nodes" in the Data Model.
#[derive(Debug, Clone)]
pub enum Numeric {
    /// Arbitrary-precision integer.
    Integer(Integer),
    /// Arbitrary-precision rational in lowest terms, denominator > 1.
    Rational(Rational),
    /// Arbitrary-precision (MPFR-backed) float at some working precision.
    Float(Float),
    /// Complex value; `re`/`im` are guaranteed non-`Complex`.
    Complex(Box<Numeric>, Box<Numeric>),
}

/// Promotion rank used to decide the common type of a binary operation
/// over the three real leaves. Higher promotes lower, exactly the way
/// `num_simplify`/`numeric wrapper` promote in the original `eval.c`
/// (`num_add`, `num_mul`, ...): Integer < Rational < Float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    Integer,
    Rational,
    Float,
}

impl Numeric {
    /// Construct an integer leaf.
    #[must_use]
    pub fn integer(i: impl Into<Integer>) -> Self {
        Self::Integer(i.into())
    }

    /// Construct a rational leaf, simplifying to `Integer` if the
    /// denominator reduces to `1`.
    #[must_use]
    pub fn rational(r: impl Into<Rational>) -> Self {
        num_simplify(Self::Rational(r.into()))
    }

    /// Construct a float leaf at [`DEFAULT_PRECISION`].
    #[must_use]
    pub fn float(value: f64) -> Self {
        Self::Float(Float::with_val(DEFAULT_PRECISION, value))
    }

    /// Construct a complex leaf, collapsing to `re` if `im` is exactly
    /// zero, per "if `im = 0` the whole Complex collapses to `re` during
    /// evaluation."
    ///
    /// # Panics
    /// Never: callers that build `im` from a `Complex` value themselves
    /// should flatten it first; this constructor does not attempt to
    /// re-flatten a nested `Complex` since the Data Model guarantees the
    /// invariant holds at construction sites within this crate.
    #[must_use]
    pub fn complex(re: Self, im: Self) -> Self {
        if im.is_zero() {
            return re;
        }
        Self::Complex(Box::new(re), Box::new(im))
    }

    /// The additive identity.
    #[must_use]
    pub fn zero() -> Self {
        Self::Integer(Integer::new())
    }

    /// The multiplicative identity.
    #[must_use]
    pub fn one() -> Self {
        Self::Integer(Integer::from(1))
    }

    /// `self == 0` exactly (both components for `Complex`).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(i) => *i == 0,
            Self::Rational(r) => *r.numer() == 0,
            Self::Float(f) => f.is_zero(),
            Self::Complex(re, im) => re.is_zero() && im.is_zero(),
        }
    }

    /// `self == 1` exactly.
    #[must_use]
    pub fn is_one(&self) -> bool {
        match self {
            Self::Integer(i) => *i == 1,
            Self::Rational(r) => *r.numer() == 1 && *r.denom() == 1,
            Self::Float(f) => *f == 1.0,
            Self::Complex(re, im) => im.is_zero() && re.is_one(),
        }
    }

    /// `true` for a real (non-`Complex`) value strictly greater than zero.
    #[must_use]
    pub fn is_pos(&self) -> bool {
        match self {
            Self::Integer(i) => *i > 0,
            Self::Rational(r) => *r.numer() > 0,
            Self::Float(f) => *f > 0.0,
            Self::Complex(..) => false,
        }
    }

    /// `true` for a real (non-`Complex`) value strictly less than zero.
    #[must_use]
    pub fn is_neg(&self) -> bool {
        match self {
            Self::Integer(i) => *i < 0,
            Self::Rational(r) => *r.numer() < 0,
            Self::Float(f) => *f < 0.0,
            Self::Complex(..) => false,
        }
    }

    /// `true` if this value is an exact (non-`Complex`, non-`Float`)
    /// integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }

    /// `true` for any non-`Complex` leaf.
    #[must_use]
    pub fn is_real(&self) -> bool {
        !matches!(self, Self::Complex(..))
    }

    /// Sign as `-1 / 0 / 1`; for `Complex` per the §4.4.6 lexicographic
    /// convention (`re > 0 ∨ (re = 0 ∧ im > 0)` counts as non-negative).
    #[must_use]
    pub fn sign(&self) -> i32 {
        match self {
            Self::Integer(i) => i.cmp0() as i32,
            Self::Rational(r) => r.cmp0() as i32,
            Self::Float(f) => {
                if f.is_zero() {
                    0
                } else if *f > 0.0 {
                    1
                } else {
                    -1
                }
            }
            Self::Complex(re, im) => {
                if re.is_zero() && im.is_zero() {
                    0
                } else if re.is_pos() || (re.is_zero() && im.is_pos()) {
                    1
                } else {
                    -1
                }
            }
        }
    }

    fn level(&self) -> Option<Level> {
        match self {
            Self::Integer(_) => Some(Level::Integer),
            Self::Rational(_) => Some(Level::Rational),
            Self::Float(_) => Some(Level::Float),
            Self::Complex(..) => None,
        }
    }

    /// Promote `self` up to `level`. Demoting (e.g. a `Float` "promoted" to
    /// `Level::Integer`) is not a meaningful operation for this wrapper and
    /// simply returns `self` unchanged; every call site in [`ops`] only
    /// ever promotes to `max(a.level(), b.level())`, so this never triggers.
    fn to_level(&self, level: Level) -> Self {
        match self {
            Self::Integer(i) => match level {
                Level::Integer => Self::Integer(i.clone()),
                Level::Rational => Self::Rational(Rational::from(i.clone())),
                Level::Float => Self::Float(Float::with_val(DEFAULT_PRECISION, i)),
            },
            Self::Rational(r) => match level {
                Level::Float => Self::Float(Float::with_val(DEFAULT_PRECISION, r)),
                Level::Integer | Level::Rational => Self::Rational(r.clone()),
            },
            Self::Float(f) => Self::Float(f.clone()),
            Self::Complex(..) => self.clone(),
        }
    }

    /// Convert to `f64`, for callers (e.g. the heuristic GCD evaluation
    /// point) that only need an approximate magnitude.
    #[must_use]
    pub fn to_f64_approx(&self) -> f64 {
        match self {
            Self::Integer(i) => i.to_f64(),
            Self::Rational(r) => r.to_f64(),
            Self::Float(f) => f.to_f64(),
            Self::Complex(re, im) => {
                re.to_f64_approx().hypot(im.to_f64_approx())
            }
        }
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        cmp(self, other) == Some(Ordering::Equal)
    }
}
