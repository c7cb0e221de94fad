//! Structural identity and the canonical total order (C4).
//!
//! Thanks to hash-consing (§4.3), two subexpressions are *structurally
//! identical* exactly when their arena ids resolve to the same slot —
//! [`identical`] is therefore an `O(1)` id comparison, never a deep walk.
//! [`cmp`] is the heavier operation: a total order over every node shape
//! so `Sum`/`Product` operands have one well-defined sorted form (used by
//! the evaluator, §4.4, to flatten and merge like terms) and so
//! polynomial terms compare by total degree before falling back to a
//! lexicographic tie-break (the "monomial-aware" part of the original's
//! `ordering.c`).

use crate::arena::node::{BinaryOp, NodeId, NodeKind, UnaryOp};
use crate::arena::Arena;
use may_numerics::Numeric;
use std::cmp::Ordering;

/// `true` if `a` and `b` denote the same node, after resolving any
/// hash-consing forwarding. Because every node is interned through
/// [`Arena::intern`], this is equivalent to (and implemented as) comparing
/// the two resolved ids directly.
#[must_use]
pub fn identical(arena: &Arena, a: NodeId, b: NodeId) -> bool {
    arena.resolve(a) == arena.resolve(b)
}

/// Used by `Arena::intern` to test a not-yet-inserted [`NodeKind`] against
/// an existing candidate node for hash-consing. Since every child id a
/// fresh `kind` can reference was itself produced by `intern`, comparing
/// children is plain `NodeId` equality; only leaf payloads (numerics,
/// strings, byte blobs) need a value comparison.
#[must_use]
pub fn identical_kind(arena: &Arena, kind: &NodeKind, candidate: NodeId) -> bool {
    let other = arena.get(candidate).kind();
    match (kind, other) {
        (NodeKind::Numeric(a), NodeKind::Numeric(b)) => a == b,
        (NodeKind::String(a), NodeKind::String(b)) => a == b,
        (NodeKind::Data(a), NodeKind::Data(b)) => a == b,
        (NodeKind::Indirect(a), NodeKind::Indirect(b)) => a == b,
        (NodeKind::UnaryFunc(op_a, a), NodeKind::UnaryFunc(op_b, b)) => op_a == op_b && a == b,
        (NodeKind::BinaryFunc(op_a, a0, a1), NodeKind::BinaryFunc(op_b, b0, b1)) => {
            op_a == op_b && a0 == b0 && a1 == b1
        }
        (NodeKind::Func(name_a, args_a), NodeKind::Func(name_b, args_b)) => {
            name_a == name_b && args_a == args_b
        }
        (NodeKind::Sum(a), NodeKind::Sum(b)) | (NodeKind::Product(a), NodeKind::Product(b)) => {
            a == b
        }
        (NodeKind::Factor(na, ta), NodeKind::Factor(nb, tb)) => na == nb && ta == tb,
        (NodeKind::Power(ab, ae), NodeKind::Power(bb, be)) => ab == bb && ae == be,
        (NodeKind::Range(as_, ao, ap), NodeKind::Range(bs, bo, bp)) => {
            as_ == bs && ao == bo && ap == bp
        }
        (NodeKind::Diff(ae, av), NodeKind::Diff(be, bv)) => ae == be && av == bv,
        (NodeKind::List(a), NodeKind::List(b)) => a == b,
        (
            NodeKind::Matrix {
                rows: ra,
                cols: ca,
                entries: ea,
            },
            NodeKind::Matrix {
                rows: rb,
                cols: cb,
                entries: eb,
            },
        ) => ra == rb && ca == cb && ea == eb,
        (NodeKind::Extension(ta, ca), NodeKind::Extension(tb, cb)) => ta == tb && ca == cb,
        _ => false,
    }
}

/// Rank used as the primary sort key of [`cmp`]: lower-ranked shapes sort
/// first. Numeric leaves always sort before any symbolic structure, and
/// `Sum` sorts last so a top-level sum's own term order is never
/// disturbed by comparing it against one of its own terms.
///
/// [`cmp`] always strips a [`NodeKind::Factor`] wrapper before computing
/// a rank (the numeric coefficient never influences ordering, per §4.6),
/// so this is never actually called with a `Factor` kind; the arm below
/// is a defensive fallback, ranked where a bare `Product` would be.
fn rank(kind: &NodeKind) -> u8 {
    match kind {
        NodeKind::Numeric(_) => 0,
        NodeKind::String(_) => 1,
        NodeKind::Data(_) => 2,
        NodeKind::Power(..) => 3,
        NodeKind::Product(_) => 4,
        NodeKind::UnaryFunc(..) => 5,
        NodeKind::BinaryFunc(..) => 6,
        NodeKind::Func(..) => 7,
        NodeKind::Range(..) => 8,
        NodeKind::Diff(..) => 9,
        NodeKind::List(_) => 10,
        NodeKind::Matrix { .. } => 11,
        NodeKind::Extension(..) => 12,
        NodeKind::Sum(_) => 13,
        NodeKind::Indirect(_) => 14,
        NodeKind::Factor(..) => 4,
    }
}

/// The integer exponent of a `Power` node, or `1` for anything else —
/// used to total up a `Product`'s degree for monomial ordering.
fn exponent_of(arena: &Arena, id: NodeId) -> i64 {
    let NodeKind::Power(_, exp) = arena.get(id).kind() else {
        return 1;
    };
    let NodeKind::Numeric(n) = arena.get(*exp).kind() else {
        return 1;
    };
    let value = n.to_f64_approx();
    if value.is_finite() {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "monomial ordering only needs an approximate degree"
        )]
        {
            value as i64
        }
    } else {
        1
    }
}

/// Total degree of a node, treated as a monomial: a bare `Power(_, e)`
/// contributes `e`, a `Product` contributes the sum of its factors'
/// degrees, anything else contributes `1`.
fn total_degree(arena: &Arena, id: NodeId) -> i64 {
    match arena.get(id).kind() {
        NodeKind::Power(..) => exponent_of(arena, id),
        NodeKind::Product(factors) => factors.iter().map(|&f| exponent_of(arena, f)).sum(),
        NodeKind::Factor(_, term) => total_degree(arena, *term),
        _ => 1,
    }
}

/// Strip a single [`NodeKind::Factor`] wrapper, returning its coefficient
/// (`1` if `id` is not a `Factor`) and the underlying term. `term` is
/// never itself a `Factor` (§3's Factor invariant), so one strip is
/// always enough.
fn unwrap_factor(arena: &Arena, id: NodeId) -> (Numeric, NodeId) {
    match arena.get(id).kind() {
        NodeKind::Factor(n, term) => (n.clone(), arena.resolve(*term)),
        _ => (Numeric::one(), id),
    }
}

/// The canonical total order over two nodes.
///
/// Ordering proceeds: numeric value, then node-shape [`rank`], then
/// (within matching shapes) total degree descending — so `x^3` sorts
/// before `x^2`, matching how a polynomial's terms are conventionally
/// listed — then a structural tie-break over children/payload, then
/// (only once the underlying terms are otherwise equal) the `Factor`
/// coefficient itself. A `Factor` wrapper is stripped from both sides
/// before any of this runs, since the numeric coefficient never
/// influences ordering (§4.6).
#[must_use]
pub fn cmp(arena: &Arena, a: NodeId, b: NodeId) -> Ordering {
    let a = arena.resolve(a);
    let b = arena.resolve(b);
    if a == b {
        return Ordering::Equal;
    }
    let ka = arena.get(a).kind();
    let kb = arena.get(b).kind();
    if let (NodeKind::Numeric(na), NodeKind::Numeric(nb)) = (ka, kb) {
        return may_numerics::cmp(na, nb).unwrap_or(Ordering::Equal);
    }

    let (coeff_a, term_a) = unwrap_factor(arena, a);
    let (coeff_b, term_b) = unwrap_factor(arena, b);
    let ta = arena.get(term_a).kind();
    let tb = arena.get(term_b).kind();

    match rank(ta).cmp(&rank(tb)) {
        Ordering::Equal => {}
        other => return other,
    }
    match total_degree(arena, term_b).cmp(&total_degree(arena, term_a)) {
        Ordering::Equal => {}
        other => return other,
    }
    cmp_same_shape(arena, ta, tb)
        .then_with(|| may_numerics::cmp(&coeff_a, &coeff_b).unwrap_or(Ordering::Equal))
}

/// Tie-break between two nodes already known to share a [`rank`].
fn cmp_same_shape(arena: &Arena, ka: &NodeKind, kb: &NodeKind) -> Ordering {
    match (ka, kb) {
        (NodeKind::String(a), NodeKind::String(b)) => a.cmp(b),
        (NodeKind::Data(a), NodeKind::Data(b)) => a.cmp(b),
        (NodeKind::Power(ab, ae), NodeKind::Power(bb, be)) => cmp(arena, *ab, *bb)
            .then_with(|| cmp(arena, *ae, *be)),
        (NodeKind::Product(a), NodeKind::Product(b)) | (NodeKind::Sum(a), NodeKind::Sum(b)) => {
            cmp_slices(arena, a, b)
        }
        (NodeKind::UnaryFunc(opa, a), NodeKind::UnaryFunc(opb, b)) => {
            unary_rank(*opa).cmp(&unary_rank(*opb)).then_with(|| cmp(arena, *a, *b))
        }
        (NodeKind::BinaryFunc(opa, a0, a1), NodeKind::BinaryFunc(opb, b0, b1)) => {
            binary_rank(*opa)
                .cmp(&binary_rank(*opb))
                .then_with(|| cmp(arena, *a0, *b0))
                .then_with(|| cmp(arena, *a1, *b1))
        }
        (NodeKind::Func(na, a), NodeKind::Func(nb, b)) => na.cmp(nb).then_with(|| cmp_slices(arena, a, b)),
        (NodeKind::Range(as_, ao, ap), NodeKind::Range(bs, bo, bp)) => cmp(arena, *as_, *bs)
            .then_with(|| cmp(arena, *ao, *bo))
            .then_with(|| cmp(arena, *ap, *bp)),
        (NodeKind::Diff(ae, av), NodeKind::Diff(be, bv)) => {
            cmp(arena, *ae, *be).then_with(|| cmp(arena, *av, *bv))
        }
        (NodeKind::List(a), NodeKind::List(b)) => cmp_slices(arena, a, b),
        (
            NodeKind::Matrix {
                rows: ra,
                cols: ca,
                entries: ea,
            },
            NodeKind::Matrix {
                rows: rb,
                cols: cb,
                entries: eb,
            },
        ) => ra.cmp(rb).then_with(|| ca.cmp(cb)).then_with(|| cmp_slices(arena, ea, eb)),
        (NodeKind::Extension(ta, ca), NodeKind::Extension(tb, cb)) => {
            ta.cmp(tb).then_with(|| cmp_slices(arena, ca, cb))
        }
        // Same rank but mismatched variants only happens for `Indirect`,
        // which `cmp`/`get` always resolve through before reaching here.
        _ => Ordering::Equal,
    }
}

fn cmp_slices(arena: &Arena, a: &[NodeId], b: &[NodeId]) -> Ordering {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| cmp(arena, x, y))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

fn unary_rank(op: UnaryOp) -> u8 {
    op as u8
}

fn binary_rank(op: BinaryOp) -> u8 {
    op as u8
}
