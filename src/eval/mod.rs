//! The canonicalizing evaluator (C5, §4.4).
//!
//! Nothing in this module ever calls `Arena::intern` on a raw,
//! un-simplified shape directly for `Sum`/`Product`/`Power`/unary or
//! binary function nodes — every public constructor here folds numeric
//! constants, flattens associative structure, merges like terms/exponents,
//! and only then interns (or returns an existing, already-simpler node).
//! Building an expression purely through these functions is what keeps a
//! node's canonical form an invariant rather than something checked after
//! the fact.

mod binary;
mod power;
mod product;
mod sum;
mod unary;

pub use binary::binary;
pub use power::power;
pub use product::product;
pub use sum::sum;
pub use unary::unary;

use crate::arena::Arena;
use crate::arena::node::{NodeId, NodeKind};
use may_numerics::Numeric;

/// Intern a numeric leaf, running it through `num_simplify` and then the
/// ambient `intmod` reduction (§9) first.
pub fn numeric(arena: &mut Arena, n: Numeric) -> NodeId {
    let simplified = may_numerics::num_simplify(n);
    let reduced = crate::config::reduce_intmod(simplified);
    arena.intern(NodeKind::Numeric(reduced))
}

/// Intern a symbol leaf.
pub fn symbol(arena: &mut Arena, name: &str) -> NodeId {
    arena.intern(NodeKind::String(name.into()))
}

/// The zero node.
pub fn zero(arena: &mut Arena) -> NodeId {
    numeric(arena, Numeric::zero())
}

/// The one node.
pub fn one(arena: &mut Arena) -> NodeId {
    numeric(arena, Numeric::one())
}

/// `true` if `id` resolves to a `Numeric` leaf equal to zero.
pub fn is_zero(arena: &Arena, id: NodeId) -> bool {
    matches!(arena.get(id).kind(), NodeKind::Numeric(n) if n.is_zero())
}

/// `true` if `id` resolves to a `Numeric` leaf equal to one.
pub fn is_one(arena: &Arena, id: NodeId) -> bool {
    matches!(arena.get(id).kind(), NodeKind::Numeric(n) if n.is_one())
}

/// The `Numeric` value of `id`, if it is a numeric leaf.
pub fn as_numeric<'a>(arena: &'a Arena, id: NodeId) -> Option<&'a Numeric> {
    match arena.get(id).kind() {
        NodeKind::Numeric(n) => Some(n),
        _ => None,
    }
}

/// Build `num * term` as a canonical [`NodeKind::Factor`], collapsing
/// every degenerate case the Factor invariant (§3) forbids: a zero
/// coefficient folds to the zero leaf, a numeric `term` folds directly
/// into one numeric leaf, a coefficient of `1` unwraps to `term` itself,
/// and wrapping an existing `Factor` multiplies the coefficients
/// together rather than nesting.
pub fn factor(arena: &mut Arena, num: Numeric, term: NodeId) -> NodeId {
    if num.is_zero() {
        return zero(arena);
    }
    if let NodeKind::Numeric(inner) = arena.get(term).kind() {
        let folded = may_numerics::mul(&num, inner);
        return numeric(arena, folded);
    }
    if let NodeKind::Factor(inner_num, inner_term) = arena.get(term).kind().clone() {
        let combined = may_numerics::mul(&num, &inner_num);
        return factor(arena, combined, inner_term);
    }
    if num.is_one() {
        return term;
    }
    arena.intern(NodeKind::Factor(num, term))
}
