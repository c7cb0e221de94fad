//! The node arena: allocation, hash-consing, and mark/compact (C1 + C3).
//!
//! The original kernel is a bump allocator over a raw heap with an
//! in-place copying compactor (`heap.c`'s `may_compact`/`may_mark`):
//! `mark()` records the current top-of-heap pointer, and `compact()`
//! walks every node above that mark, relocating anything still reachable
//! down to just above the mark and discarding the rest by simply moving
//! the heap's top pointer back.
//!
//! This crate forbids `unsafe`, so pointer relocation isn't on the table.
//! Instead, nodes live in a [`slotmap::SlotMap`] keyed by a generational
//! [`NodeId`]; `mark()` hands back a [`Mark`] token, and `compact()` does
//! a reachability sweep from a caller-supplied root set and rebuilds the
//! map, returning a translation table so callers can update any
//! `NodeId`s they are still holding onto. The *effect* — "nodes
//! unreachable from the live roots stop taking up space" — is the same;
//! only the mechanism changed.

mod hash;
pub mod node;

use node::{Node, NodeId, NodeKind};
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

/// An opaque checkpoint returned by [`Arena::mark`].
///
/// Kept only for API symmetry with the original's `catch`/`mark` pairing;
/// since `compact` always does a full reachability sweep rather than a
/// region scoped to "everything allocated since this mark", the token
/// itself carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(());

/// The node arena. Owns every [`Node`] reachable through any [`NodeId`]
/// handed out by [`Arena::intern`].
#[derive(Debug, Default)]
pub struct Arena {
    nodes: SlotMap<NodeId, Node>,
    table: FxHashMap<u64, Vec<NodeId>>,
    /// Nesting depth of outstanding [`Arena::chained_compact1`] calls;
    /// while nonzero, [`Arena::compact`]/[`Arena::compact_v`]/[`Arena::keep`]
    /// are no-ops, deferring the one real sweep to the matching
    /// [`Arena::chained_compact2`].
    deferred_compactions: u32,
}

impl Arena {
    /// An empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a [`NodeId`] to its node, following any `Indirect` chain
    /// left behind by hash-consing.
    ///
    /// # Panics
    /// If `id` does not belong to this arena. Every `NodeId` the kernel
    /// hands out comes from [`Arena::intern`] on this same arena, so a
    /// foreign key reaching here is a caller bug, not a recoverable
    /// runtime condition.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        let mut current = id;
        loop {
            let node = self
                .nodes
                .get(current)
                .expect("NodeId must belong to this arena");
            match node.kind {
                NodeKind::Indirect(target) => current = target,
                _ => return node,
            }
        }
    }

    /// The node's true id, after following any `Indirect` forwarding
    /// chain (the id hash-consing ultimately settled on).
    #[must_use]
    pub fn resolve(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let NodeKind::Indirect(target) = self
            .nodes
            .get(current)
            .expect("NodeId must belong to this arena")
            .kind
        {
            current = target;
        }
        current
    }

    /// Intern a node: if a structurally identical node already exists,
    /// return its id; otherwise insert `kind` as a new node and return
    /// the fresh id.
    ///
    /// This is the single allocation entry point — every constructor in
    /// [`crate::eval`] and [`crate::poly`] goes through `intern` rather
    /// than inserting into the slot map directly, which is what makes
    /// structural equality reduce to `NodeId` equality for any two
    /// interned nodes.
    pub fn intern(&mut self, kind: NodeKind) -> NodeId {
        let h = hash::compose(&kind, |id| self.get(id).hash);
        if let Some(candidates) = self.table.get(&h) {
            for &candidate in candidates {
                if crate::ordering::identical_kind(self, &kind, candidate) {
                    return candidate;
                }
            }
        }
        let id = self.nodes.insert(Node { kind, hash: h });
        self.table.entry(h).or_default().push(id);
        id
    }

    /// Snapshot the current arena state as a checkpoint for a later
    /// [`Arena::compact`].
    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark(())
    }

    /// Walk `roots` and every node reachable from them, returning the
    /// full reachable set.
    fn reachable(&self, roots: &[NodeId]) -> FxHashSet<NodeId> {
        let mut seen = FxHashSet::default();
        let mut stack: Vec<NodeId> = roots.iter().map(|&r| self.resolve(r)).collect();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            for child in children_of(&self.nodes[id].kind) {
                stack.push(self.resolve(child));
            }
        }
        seen
    }

    /// Rebuild the arena keeping only nodes reachable from `roots`,
    /// discarding every `Indirect` forwarding entry and every
    /// unreachable node. `roots` are updated in place to their new ids.
    ///
    /// `_mark` is accepted for API symmetry with the original's
    /// `mark`/`compact` pairing but does not scope the sweep — every
    /// `compact` call is a full reachability pass from `roots`. A no-op
    /// while a [`Arena::chained_compact1`] has deferred compaction.
    pub fn compact(&mut self, _mark: Mark, roots: &mut [NodeId]) {
        if self.deferred_compactions > 0 {
            return;
        }
        let live = self.reachable(roots);
        let mut fresh = SlotMap::with_key();
        let mut remap: FxHashMap<NodeId, NodeId> = FxHashMap::default();
        // First pass: allocate every surviving node's new slot so
        // remapped child ids are always already known on the second pass.
        for &old_id in &live {
            let resolved_kind = self.nodes[old_id].kind.clone();
            let new_id = fresh.insert(Node {
                kind: resolved_kind,
                hash: self.nodes[old_id].hash,
            });
            remap.insert(old_id, new_id);
        }
        for &old_id in &live {
            let new_id = remap[&old_id];
            let remapped = remap_children(&fresh[new_id].kind, &remap);
            fresh[new_id].kind = remapped;
        }
        self.table.clear();
        for (new_id, node) in fresh.iter() {
            self.table.entry(node.hash).or_default().push(new_id);
        }
        self.nodes = fresh;
        for root in roots.iter_mut() {
            let resolved = self.resolve(*root);
            *root = remap[&resolved];
        }
        crate::config::record_compaction(self.nodes.len());
    }

    /// Vector form of [`Arena::keep`] (§4.1's `compact_v(mark, xs)`):
    /// identical sweep, taking every live root at once so their relative
    /// layout is preserved.
    pub fn compact_v(&mut self, mark: Mark, roots: &mut [NodeId]) {
        self.compact(mark, roots);
    }

    /// Single-root convenience wrapper around [`Arena::compact_v`]
    /// (§4.1's `keep(mark, x)`): compacts around just `root` and returns
    /// its id after the sweep (unchanged if compaction is currently
    /// deferred by [`Arena::chained_compact1`]).
    pub fn keep(&mut self, mark: Mark, root: NodeId) -> NodeId {
        let mut roots = [root];
        self.compact_v(mark, &mut roots);
        roots[0]
    }

    /// Defer compaction: a sequence of nested functions that would each
    /// otherwise run their own `compact`/`keep` can call this first so
    /// only the outermost caller's matching [`Arena::chained_compact2`]
    /// actually sweeps.
    pub fn chained_compact1(&mut self) {
        self.deferred_compactions += 1;
    }

    /// Pair to [`Arena::chained_compact1`]: undoes one deferral, and once
    /// every nested deferral has been undone (the outermost boundary),
    /// performs the one real sweep around `roots`.
    pub fn chained_compact2(&mut self, mark: Mark, roots: &mut [NodeId]) {
        self.deferred_compactions = self.deferred_compactions.saturating_sub(1);
        if self.deferred_compactions == 0 {
            self.compact(mark, roots);
        }
    }
}

/// The direct children of a node, for reachability and remapping.
fn children_of(kind: &NodeKind) -> Vec<NodeId> {
    match kind {
        NodeKind::Numeric(_) | NodeKind::String(_) | NodeKind::Data(_) => Vec::new(),
        NodeKind::Indirect(target) => vec![*target],
        NodeKind::Factor(_, term) => vec![*term],
        NodeKind::UnaryFunc(_, a) => vec![*a],
        NodeKind::BinaryFunc(_, a, b) | NodeKind::Power(a, b) | NodeKind::Diff(a, b) => {
            vec![*a, *b]
        }
        NodeKind::Func(_, args) | NodeKind::Sum(args) | NodeKind::Product(args) => args.clone(),
        NodeKind::List(items) => items.clone(),
        NodeKind::Range(start, stop, step) => vec![*start, *stop, *step],
        NodeKind::Matrix { entries, .. } => entries.clone(),
        NodeKind::Extension(_, children) => children.clone(),
    }
}

/// Rewrite every child `NodeId` of `kind` through `remap`.
fn remap_children(kind: &NodeKind, remap: &FxHashMap<NodeId, NodeId>) -> NodeKind {
    let r = |id: &NodeId| remap[id];
    match kind {
        NodeKind::Numeric(n) => NodeKind::Numeric(n.clone()),
        NodeKind::String(s) => NodeKind::String(s.clone()),
        NodeKind::Data(d) => NodeKind::Data(d.clone()),
        NodeKind::Indirect(target) => NodeKind::Indirect(r(target)),
        NodeKind::Factor(n, term) => NodeKind::Factor(n.clone(), r(term)),
        NodeKind::UnaryFunc(op, a) => NodeKind::UnaryFunc(*op, r(a)),
        NodeKind::BinaryFunc(op, a, b) => NodeKind::BinaryFunc(*op, r(a), r(b)),
        NodeKind::Func(name, args) => NodeKind::Func(name.clone(), args.iter().map(r).collect()),
        NodeKind::Sum(args) => NodeKind::Sum(args.iter().map(r).collect()),
        NodeKind::Product(args) => NodeKind::Product(args.iter().map(r).collect()),
        NodeKind::Power(base, exp) => NodeKind::Power(r(base), r(exp)),
        NodeKind::Range(start, stop, step) => NodeKind::Range(r(start), r(stop), r(step)),
        NodeKind::Diff(expr, var) => NodeKind::Diff(r(expr), r(var)),
        NodeKind::List(items) => NodeKind::List(items.iter().map(r).collect()),
        NodeKind::Matrix { rows, cols, entries } => NodeKind::Matrix {
            rows: *rows,
            cols: *cols,
            entries: entries.iter().map(r).collect(),
        },
        NodeKind::Extension(tag, children) => {
            NodeKind::Extension(tag.clone(), children.iter().map(r).collect())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::node::NodeKind;
    use super::Arena;
    use may_numerics::Numeric;

    #[test]
    fn hash_consing_dedupes_equal_leaves() {
        let mut arena = Arena::new();
        let a = arena.intern(NodeKind::Numeric(Numeric::integer(7)));
        let b = arena.intern(NodeKind::Numeric(Numeric::integer(7)));
        assert_eq!(a, b);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn distinct_leaves_get_distinct_ids() {
        let mut arena = Arena::new();
        let a = arena.intern(NodeKind::Numeric(Numeric::integer(7)));
        let b = arena.intern(NodeKind::Numeric(Numeric::integer(8)));
        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn compact_drops_unreachable_nodes() {
        let mut arena = Arena::new();
        let keep = arena.intern(NodeKind::Numeric(Numeric::integer(1)));
        let _garbage = arena.intern(NodeKind::Numeric(Numeric::integer(2)));
        assert_eq!(arena.len(), 2);
        let mark = arena.mark();
        let mut roots = [keep];
        arena.compact(mark, &mut roots);
        assert_eq!(arena.len(), 1);
        assert!(matches!(
            arena.get(roots[0]).kind(),
            NodeKind::Numeric(n) if n.is_one()
        ));
    }

    #[test]
    fn compact_preserves_sum_structure() {
        let mut arena = Arena::new();
        let one = arena.intern(NodeKind::Numeric(Numeric::one()));
        let two = arena.intern(NodeKind::Numeric(Numeric::integer(2)));
        let sum = arena.intern(NodeKind::Sum(vec![one, two]));
        let mark = arena.mark();
        let mut roots = [sum];
        arena.compact(mark, &mut roots);
        assert_eq!(arena.len(), 3);
        let NodeKind::Sum(terms) = arena.get(roots[0]).kind() else {
            panic!("expected Sum");
        };
        assert_eq!(terms.len(), 2);
    }

    #[test]
    fn keep_drops_unreachable_nodes_like_compact() {
        let mut arena = Arena::new();
        let keep_id = arena.intern(NodeKind::Numeric(Numeric::integer(1)));
        let _garbage = arena.intern(NodeKind::Numeric(Numeric::integer(2)));
        let mark = arena.mark();
        let kept = arena.keep(mark, keep_id);
        assert_eq!(arena.len(), 1);
        assert!(matches!(arena.get(kept).kind(), NodeKind::Numeric(n) if n.is_one()));
    }

    #[test]
    fn chained_compact_defers_until_outermost_call() {
        let mut arena = Arena::new();
        let keep_id = arena.intern(NodeKind::Numeric(Numeric::integer(1)));
        let _garbage = arena.intern(NodeKind::Numeric(Numeric::integer(2)));
        let mark = arena.mark();

        arena.chained_compact1();
        arena.chained_compact1();
        let mut roots = [keep_id];
        // Nested deferral: the inner boundary must not sweep yet.
        arena.chained_compact2(mark, &mut roots);
        assert_eq!(arena.len(), 2);
        // Outermost boundary: now it actually sweeps.
        arena.chained_compact2(mark, &mut roots);
        assert_eq!(arena.len(), 1);
    }
}
