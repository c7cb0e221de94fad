//! Per-thread tunable configuration (§6).
//!
//! Mirrors the original's global tuning knobs (`t-tune.c`'s threshold
//! table, the numeric layer's working precision, the default assumed
//! domain for unconstrained symbols) as one `Context` value that callers
//! install for the current thread rather than passing through every
//! function call.

use crate::domain::Domain;
use may_numerics::{Numeric, DEFAULT_PRECISION};
use std::cell::RefCell;

/// Floating-point rounding mode, mirrored from the original's `mpfr`
/// rounding-mode global (`error.c`'s `may_kernel_intmod`/precision
/// pairing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round to nearest, ties to even (the `mpfr` default).
    Nearest,
    /// Round toward zero.
    TowardZero,
    /// Round toward positive infinity.
    TowardPositive,
    /// Round toward negative infinity.
    TowardNegative,
}

impl Default for RoundingMode {
    fn default() -> Self {
        Self::Nearest
    }
}

/// Tunable parameters for one thread's evaluation and polynomial
/// operations.
///
/// Unlike the rest of the kernel's nodes, `Context` is not interned or
/// hash-consed; it is plain thread-local state, cloned wholesale by
/// [`set_current`]/[`with_context`] and field-by-field by the atomic
/// accessors below.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    /// Working precision, in bits of mantissa, for freshly constructed
    /// `Float` leaves.
    pub precision: u32,
    /// Rounding mode applied when a `Float` operation's exact result
    /// cannot be represented at `precision`.
    pub rounding_mode: RoundingMode,
    /// Base used when rendering a numeric leaf to text (2-36).
    pub output_base: u32,
    /// Ambient integer modulus: when set, integer arithmetic throughout
    /// the kernel is implicitly reduced modulo this value via
    /// [`may_numerics::smod`] (§9: "the `intmod` switch"). `None` means
    /// ordinary unbounded integer arithmetic.
    pub intmod: Option<Numeric>,
    /// Domain assumed for a free symbol with no declared domain.
    pub default_domain: Domain,
    /// Whether newly built nodes are immediately run through the
    /// canonicalizing evaluator, or left as raw structural trees for a
    /// caller to evaluate in bulk later.
    pub presimplify: bool,
    /// Node-count operand threshold above which `Sum`/`Product`
    /// canonicalization switches from insertion sort to a merge sort
    /// (`t-tune.c`'s `SORT_THRESHOLD`).
    pub sort_threshold: usize,
    /// Total-degree threshold above which the polynomial multiplier
    /// switches from the schoolbook algorithm to Karatsuba
    /// (`t-tune.c`'s `KARATSUBA_THRESHOLD`).
    pub karatsuba_threshold: usize,
    /// Maximum number of evaluation points the heuristic GCD path will
    /// try (each point drawn from a widening symmetric range) before
    /// [`crate::poly::gcd::gcd`] falls back to sub-resultant PRS.
    pub gcd_max_evaluation_points: usize,
    /// Ceiling, in decimal digits, on any single intermediate integer
    /// produced while reconstructing a heuristic-GCD result from its
    /// evaluation points; exceeding it aborts the heuristic path in
    /// favor of the sub-resultant fallback rather than building an
    /// unboundedly large bignum.
    pub max_intermediate_integer_digits: u32,
    /// Ceiling on the number of live nodes an arena may hold before
    /// allocation fails with [`crate::error::MayError::ArenaExhausted`].
    pub max_nodes: usize,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            rounding_mode: RoundingMode::default(),
            output_base: 10,
            intmod: None,
            default_domain: Domain::COMPLEX,
            presimplify: true,
            sort_threshold: 16,
            karatsuba_threshold: 32,
            gcd_max_evaluation_points: 8,
            max_intermediate_integer_digits: 10_000,
            max_nodes: 4_000_000,
        }
    }
}

/// Arena growth/compaction counters for the current thread.
///
/// The original tracks `max_top`/`num_resize` as C globals updated by
/// `heap.c`'s allocator and printed with `fprintf(stderr, ...)` on
/// extension. This crate's lints deny `print_stderr`, so the counters
/// are kept but exposed only as plain numbers via [`stats`] for a caller
/// to log however it prefers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Number of times [`crate::arena::Arena::compact`] has run.
    pub resize_count: u64,
    /// The largest live node count observed just before a compaction.
    pub max_top_words: usize,
}

thread_local! {
    static CONTEXT: RefCell<Context> = RefCell::new(Context::default());
    static STATS: std::cell::Cell<Stats> = std::cell::Cell::new(Stats::default());
}

/// Read the current thread's arena growth counters.
#[must_use]
pub fn stats() -> Stats {
    STATS.with(std::cell::Cell::get)
}

/// Record one compaction: bump `resize_count` and raise `max_top_words`
/// to `live_nodes` if it is a new high.
pub fn record_compaction(live_nodes: usize) {
    STATS.with(|cell| {
        let mut s = cell.get();
        s.resize_count += 1;
        s.max_top_words = s.max_top_words.max(live_nodes);
        cell.set(s);
    });
}

/// Read the context installed for the current thread.
#[must_use]
pub fn current() -> Context {
    CONTEXT.with(|cell| cell.borrow().clone())
}

/// Install `ctx` as the current thread's context, returning whatever was
/// previously installed.
pub fn set_current(ctx: Context) -> Context {
    CONTEXT.with(|cell| cell.replace(ctx))
}

/// Run `f` with `ctx` installed, restoring the previous context
/// afterwards even if `f` unwinds.
pub fn with_context<T>(ctx: Context, f: impl FnOnce() -> T) -> T {
    struct Restore(Option<Context>);
    impl Drop for Restore {
        fn drop(&mut self) {
            if let Some(previous) = self.0.take() {
                set_current(previous);
            }
        }
    }
    let _restore = Restore(Some(set_current(ctx)));
    f()
}

/// Macro-generate a per-field atomic get-and-set pair: `set_*(new) ->
/// old` (§6: "Each is an atomic get-and-set; a set operation returns the
/// previous value"), plus a matching `get_*`.
macro_rules! field_accessor {
    ($get:ident, $set:ident, $field:ident, $ty:ty) => {
        #[doc = concat!("Read the current thread's `", stringify!($field), "`.")]
        #[must_use]
        pub fn $get() -> $ty {
            CONTEXT.with(|cell| cell.borrow().$field.clone())
        }

        #[doc = concat!(
            "Set the current thread's `",
            stringify!($field),
            "`, returning the value it held before."
        )]
        pub fn $set(value: $ty) -> $ty {
            CONTEXT.with(|cell| std::mem::replace(&mut cell.borrow_mut().$field, value))
        }
    };
}

field_accessor!(precision, set_precision, precision, u32);
field_accessor!(rounding_mode, set_rounding_mode, rounding_mode, RoundingMode);
field_accessor!(output_base, set_output_base, output_base, u32);
field_accessor!(intmod, set_intmod, intmod, Option<Numeric>);
field_accessor!(default_domain, set_default_domain, default_domain, Domain);
field_accessor!(presimplify, set_presimplify, presimplify, bool);
field_accessor!(sort_threshold, set_sort_threshold, sort_threshold, usize);
field_accessor!(karatsuba_threshold, set_karatsuba_threshold, karatsuba_threshold, usize);
field_accessor!(
    gcd_max_evaluation_points,
    set_gcd_max_evaluation_points,
    gcd_max_evaluation_points,
    usize
);
field_accessor!(
    max_intermediate_integer_digits,
    set_max_intermediate_integer_digits,
    max_intermediate_integer_digits,
    u32
);
field_accessor!(max_nodes, set_max_nodes, max_nodes, usize);

/// Reduce `n` modulo the current thread's [`Context::intmod`], if one is
/// installed; returns `n` unchanged otherwise. Called from
/// [`crate::eval::numeric`], the single choke point every numeric leaf is
/// interned through, so the ambient modulus switch (§9) bites on every
/// numeric result without every arithmetic call site needing to know
/// about it.
#[must_use]
pub fn reduce_intmod(n: Numeric) -> Numeric {
    match intmod() {
        Some(m) if !m.is_zero() => may_numerics::smod(&n, &m).unwrap_or(n),
        _ => n,
    }
}

#[cfg(test)]
mod tests {
    use super::{current, set_intmod, with_context, Context};

    #[test]
    fn default_precision_matches_numeric_crate() {
        assert_eq!(current().precision, may_numerics::DEFAULT_PRECISION);
    }

    #[test]
    fn with_context_restores_previous() {
        let before = current();
        with_context(
            Context {
                precision: 64,
                ..before.clone()
            },
            || {
                assert_eq!(current().precision, 64);
            },
        );
        assert_eq!(current(), before);
    }

    #[test]
    fn set_intmod_returns_previous_value() {
        let previous = set_intmod(Some(may_numerics::Numeric::integer(7)));
        assert_eq!(previous, None);
        let previous = set_intmod(None);
        assert_eq!(previous, Some(may_numerics::Numeric::integer(7)));
    }
}
