//! Domain assumptions attached to a free symbol (§6).
//!
//! A symbol with no further information is assumed `COMPLEX`; declaring it
//! `REAL`, `POSITIVE`, `INTEGER`, and so on narrows what the evaluator is
//! willing to assume when deciding whether a simplification is valid (for
//! instance, `sqrt(x^2) = x` only holds once `x` is known `REAL_NONNEGATIVE`).
//! The bits compose: `INTEGER | POSITIVE` describes a positive integer.

use bitflags::bitflags;

bitflags! {
    /// A set of domain assumptions about a symbol or sub-expression.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Domain: u16 {
        /// Known to be a real number (excludes a nonzero imaginary part).
        const REAL = 1 << 0;
        /// Known real and `> 0`.
        const POSITIVE = 1 << 1;
        /// Known real and `< 0`.
        const NEGATIVE = 1 << 2;
        /// Known `!= 0` (real or complex).
        const NONZERO = 1 << 3;
        /// Known to be an integer.
        const INTEGER = 1 << 4;
        /// Known to be rational (implied by `INTEGER`).
        const RATIONAL = 1 << 5;
        /// No further assumption: may be any complex number, including
        /// zero. This is the default for an undeclared symbol.
        const COMPLEX = 0;
    }
}

impl Domain {
    /// Narrow `self` by intersecting with `other`, the way combining two
    /// assumptions about the same symbol works (e.g. `REAL` known from one
    /// context and `POSITIVE` known from another combine to
    /// `REAL | POSITIVE`).
    #[must_use]
    pub fn refine(self, other: Self) -> Self {
        self | other
    }

    /// `true` if every value in this domain is real (no nonzero imaginary
    /// part is possible).
    #[must_use]
    pub fn is_real(self) -> bool {
        self.contains(Self::REAL)
            || self.contains(Self::POSITIVE)
            || self.contains(Self::NEGATIVE)
            || self.contains(Self::INTEGER)
            || self.contains(Self::RATIONAL)
    }

    /// `true` if every value in this domain is strictly positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.contains(Self::POSITIVE)
    }

    /// `true` if every value in this domain is strictly negative.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.contains(Self::NEGATIVE)
    }

    /// `true` if every value in this domain is known nonzero.
    #[must_use]
    pub fn is_nonzero(self) -> bool {
        self.contains(Self::NONZERO)
            || self.contains(Self::POSITIVE)
            || self.contains(Self::NEGATIVE)
    }

    /// `true` if every value in this domain is an integer.
    #[must_use]
    pub fn is_integer(self) -> bool {
        self.contains(Self::INTEGER)
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::COMPLEX
    }
}

#[cfg(test)]
mod tests {
    use super::Domain;

    #[test]
    fn positive_implies_real_and_nonzero() {
        let d = Domain::POSITIVE;
        assert!(d.is_real());
        assert!(d.is_nonzero());
        assert!(!d.is_integer());
    }

    #[test]
    fn refine_combines_assumptions() {
        let d = Domain::INTEGER.refine(Domain::POSITIVE);
        assert!(d.is_integer());
        assert!(d.is_positive());
    }

    #[test]
    fn default_is_unconstrained_complex() {
        assert_eq!(Domain::default(), Domain::COMPLEX);
        assert!(!Domain::COMPLEX.is_real());
    }
}
