//! Incremental structural hash composition (§4.3).
//!
//! Every node's hash is computed once, from its tag and the already-known
//! hashes of its children — never by re-hashing the whole subtree. This
//! is what makes hash-consing cheap: comparing two candidate nodes for
//! "already exists" starts with an O(1) hash comparison before falling
//! back to [`crate::ordering::identical`] on a collision.

use super::node::{BinaryOp, NodeKind, UnaryOp};
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// A small tag distinguishing each [`NodeKind`] variant in the hash,
/// independent of its `Discriminant` (which isn't guaranteed stable
/// across compiler versions and isn't `Hash`).
fn tag(kind: &NodeKind) -> u8 {
    match kind {
        NodeKind::Numeric(_) => 0,
        NodeKind::String(_) => 1,
        NodeKind::Data(_) => 2,
        NodeKind::Indirect(_) => 3,
        NodeKind::UnaryFunc(..) => 4,
        NodeKind::BinaryFunc(..) => 5,
        NodeKind::Func(..) => 6,
        NodeKind::Sum(_) => 7,
        NodeKind::Product(_) => 8,
        NodeKind::Power(..) => 9,
        NodeKind::Range(..) => 10,
        NodeKind::Diff(..) => 11,
        NodeKind::List(_) => 12,
        NodeKind::Matrix { .. } => 13,
        NodeKind::Extension(..) => 14,
        NodeKind::Factor(..) => 15,
    }
}

/// Compute the structural hash of a node given its own payload and a
/// function that resolves a child [`NodeId`] to its already-computed
/// hash.
///
/// Numeric leaves are hashed by value: two `Numeric`s that compare equal
/// (via `may_numerics::cmp`) must hash equal, so the hash is computed from
/// `to_f64_approx` bit pattern combined with the exact `Debug`
/// representation's bytes rather than `Numeric`'s own internal
/// representation (`rug` types don't implement `Hash`).
pub fn compose(kind: &NodeKind, child_hash: impl Fn(super::node::NodeId) -> u64) -> u64 {
    let mut hasher = FxHasher::default();
    tag(kind).hash(&mut hasher);
    match kind {
        NodeKind::Numeric(n) => {
            // `rug` numerics aren't `Hash`; their canonical `Debug` text
            // is, and two numerics that are `num_simplify`d to the same
            // leaf always render identically.
            format!("{n:?}").hash(&mut hasher);
        }
        NodeKind::String(s) => s.hash(&mut hasher),
        NodeKind::Data(bytes) => bytes.hash(&mut hasher),
        NodeKind::Indirect(target) => child_hash(*target).hash(&mut hasher),
        NodeKind::Factor(n, term) => {
            format!("{n:?}").hash(&mut hasher);
            child_hash(*term).hash(&mut hasher);
        }
        NodeKind::UnaryFunc(op, a) => {
            hash_unary_op(*op).hash(&mut hasher);
            child_hash(*a).hash(&mut hasher);
        }
        NodeKind::BinaryFunc(op, a, b) => {
            hash_binary_op(*op).hash(&mut hasher);
            child_hash(*a).hash(&mut hasher);
            child_hash(*b).hash(&mut hasher);
        }
        NodeKind::Func(name, args) => {
            name.hash(&mut hasher);
            for a in args {
                child_hash(*a).hash(&mut hasher);
            }
        }
        NodeKind::Sum(terms) | NodeKind::Product(terms) | NodeKind::List(terms) => {
            for t in terms {
                child_hash(*t).hash(&mut hasher);
            }
        }
        NodeKind::Power(base, exp) => {
            child_hash(*base).hash(&mut hasher);
            child_hash(*exp).hash(&mut hasher);
        }
        NodeKind::Range(start, stop, step) => {
            child_hash(*start).hash(&mut hasher);
            child_hash(*stop).hash(&mut hasher);
            child_hash(*step).hash(&mut hasher);
        }
        NodeKind::Diff(expr, var) => {
            child_hash(*expr).hash(&mut hasher);
            child_hash(*var).hash(&mut hasher);
        }
        NodeKind::Matrix { rows, cols, entries } => {
            rows.hash(&mut hasher);
            cols.hash(&mut hasher);
            for e in entries {
                child_hash(*e).hash(&mut hasher);
            }
        }
        NodeKind::Extension(tag, children) => {
            tag.hash(&mut hasher);
            for c in children {
                child_hash(*c).hash(&mut hasher);
            }
        }
    }
    hasher.finish()
}

fn hash_unary_op(op: UnaryOp) -> u8 {
    op as u8
}

fn hash_binary_op(op: BinaryOp) -> u8 {
    op as u8
}
