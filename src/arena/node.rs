//! Node payload shapes (the Data Model's node tags) and their arena key.

use may_numerics::Numeric;
use slotmap::new_key_type;

new_key_type! {
    /// A handle to a node stored in an [`Arena`](super::Arena).
    ///
    /// Cheap to copy, stable across everything except a [`compact`]
    /// (super::Arena::compact) pass (which remaps every surviving
    /// `NodeId` and hands back the translation).
    pub struct NodeId;
}

/// The unary transcendental/structural operators (`exp`, `sin`, `conj`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Log,
    /// Absolute value / complex modulus.
    Abs,
    /// Sign (`-1`, `0`, `1`, or unit-modulus for complex).
    Sign,
    /// Floor.
    Floor,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Arcsine.
    Asin,
    /// Arccosine.
    Acos,
    /// Arctangent.
    Atan,
    /// Hyperbolic sine.
    Sinh,
    /// Hyperbolic cosine.
    Cosh,
    /// Hyperbolic tangent.
    Tanh,
    /// Inverse hyperbolic sine.
    Asinh,
    /// Inverse hyperbolic cosine.
    Acosh,
    /// Inverse hyperbolic tangent.
    Atanh,
    /// Complex conjugate.
    Conj,
    /// Real part.
    Real,
    /// Imaginary part.
    Imag,
    /// Complex argument (angle).
    Argument,
    /// Gamma function.
    Gamma,
}

/// The binary structural operators that are not `Sum`/`Product`/`Power`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Symbolic modulus (`a mod n`).
    Mod,
    /// Symbolic, unevaluated `gcd(a, b)`.
    Gcd,
}

/// One node's payload. Every child reference is a [`NodeId`] into the same
/// [`Arena`](super::Arena).
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// An opaque numeric leaf (Integer/Rational/Float/Complex, §3).
    Numeric(Numeric),
    /// An interned symbol or free-form string leaf.
    String(Box<str>),
    /// An opaque byte blob, compared only by identity/content, never by
    /// the canonical order (used for foreign/extension payloads).
    Data(Box<[u8]>),
    /// A hash-consing forwarding pointer: this node has been superseded by
    /// another, structurally identical, node. Dereferencing always
    /// follows the chain to a non-`Indirect` node.
    Indirect(NodeId),
    /// A numeric coefficient times a non-numeric term (`num * term`,
    /// §3's "Factor node"): `num` is never `0` or `1`, and `term` is
    /// never itself `Numeric`, `Sum`, or `Factor`. This is how `Sum`/
    /// `Product` canonicalization attaches a coefficient to a term
    /// without that coefficient ever appearing as a bare operand inside
    /// a `Product`.
    Factor(Numeric, NodeId),
    /// `op(operand)`.
    UnaryFunc(UnaryOp, NodeId),
    /// `op(lhs, rhs)`.
    BinaryFunc(BinaryOp, NodeId, NodeId),
    /// A named function call with an arbitrary arity (anything not given
    /// its own tag above).
    Func(Box<str>, Vec<NodeId>),
    /// An n-ary sum of addends, canonical order per [`crate::ordering`].
    Sum(Vec<NodeId>),
    /// An n-ary product of factors, canonical order per
    /// [`crate::ordering`].
    Product(Vec<NodeId>),
    /// `base ^ exponent`.
    Power(NodeId, NodeId),
    /// `start .. stop` stepping by `step`.
    Range(NodeId, NodeId, NodeId),
    /// An unevaluated (data-only) derivative marker: differentiate
    /// `expr` with respect to `var`.
    Diff(NodeId, NodeId),
    /// An ordered, non-canonicalized list of elements.
    List(Vec<NodeId>),
    /// A dense row-major matrix.
    Matrix {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
        /// `rows * cols` entries, row-major.
        entries: Vec<NodeId>,
    },
    /// A foreign/extension node identified by a string tag, carrying an
    /// arbitrary child list the kernel does not interpret itself.
    Extension(Box<str>, Vec<NodeId>),
}

/// One arena slot: a node's payload plus its precomputed structural hash
/// (§4.3's incremental hash composition).
#[derive(Debug, Clone)]
pub struct Node {
    pub(super) kind: NodeKind,
    pub(super) hash: u64,
}

impl Node {
    /// The node's payload.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The node's precomputed structural hash.
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }
}
