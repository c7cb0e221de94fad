//! The "unevaluated/dummy" destination handle (§4.2).
//!
//! The original numeric wrapper takes an optional destination handle on
//! every primitive: `DUMMY` means "allocate fresh", anything else means
//! "overwrite this node's payload in place". Rust's ownership model makes
//! the general case (`Dest::Dummy`, i.e. just return a fresh [`Numeric`])
//! the overwhelmingly common one, so the free functions in [`crate::ops`]
//! default to it directly. [`Dest::Reuse`] is kept for the evaluator's
//! hot coalescing loops (merging like terms in a Sum/Product), where
//! writing the accumulated value into an existing slot instead of
//! allocating a new [`Numeric`] each iteration avoids one allocation per
//! term.

use crate::Numeric;

/// Where a numeric operation should place its result.
pub enum Dest<'a> {
    /// Allocate a fresh value (the common case).
    Dummy,
    /// Overwrite the payload of an existing value in place.
    Reuse(&'a mut Numeric),
}

impl<'a> Dest<'a> {
    /// Resolve this destination, writing `value` into a `Reuse` slot (and
    /// returning a clone of what was written, since the arena-facing API
    /// still needs a by-value `Numeric` to install into a node) or just
    /// returning `value` for `Dummy`.
    pub(crate) fn place(self, value: Numeric) -> Numeric {
        match self {
            Dest::Dummy => value,
            Dest::Reuse(slot) => {
                *slot = value.clone();
                value
            }
        }
    }
}
