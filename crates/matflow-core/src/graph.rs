//! The signal graph: ordered update edges over the slot arena.
//!
//! An edge binds one target slot (sensor or buffer state) to the
//! ordered list of providers its transfer function reads. Edges are
//! stored in insertion order and evaluated in that order, with
//! immediate write-through: a later edge reading a slot an earlier edge
//! wrote observes the new value, while provider readings within one
//! edge are snapshotted before the write.
//!
//! Registration order is therefore part of the plant's semantics: an
//! edge computing a buffer's fill level must be registered after the
//! edges producing the transported quantities it consumes, but reads
//! the buffer's own pre-tick level (the buffer is its own provider).
//!
//! Each slot is written by at most one edge per tick (single-writer
//! rule); the plant enforces this at registration.

use matflow_model::Tap;
use serde::{Deserialize, Serialize};

/// Index of a slot in the plant's flat registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey(pub(crate) usize);

impl SlotKey {
    /// Position in the flat slot registry.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl core::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

/// A read-only accessor for one provider input: which slot to read and
/// whether to read its value or its activation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// The slot to read.
    pub slot: SlotKey,
    /// Value or status view.
    pub tap: Tap,
}

/// One update rule: target slot plus its ordered provider inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEdge {
    /// The slot this edge writes (exactly one per edge).
    pub target: SlotKey,
    /// Provider inputs, in the order the transfer function expects.
    pub providers: Vec<Provider>,
}

/// Insertion-ordered collection of update edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalGraph {
    /// Edges in registration order.
    edges: Vec<SignalEdge>,
}

impl SignalGraph {
    /// Create an empty graph.
    pub const fn new() -> Self {
        Self { edges: Vec::new() }
    }

    /// Append an edge. Order of registration is order of evaluation.
    pub fn push(&mut self, edge: SignalEdge) {
        self.edges.push(edge);
    }

    /// All edges in evaluation order.
    pub fn edges(&self) -> &[SignalEdge] {
        &self.edges
    }

    /// The edge at `index`, if any.
    pub fn edge(&self, index: usize) -> Option<&SignalEdge> {
        self.edges.get(index)
    }

    /// Number of registered edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Whether some edge already writes `target` (single-writer check).
    pub fn has_target(&self, target: SlotKey) -> bool {
        self.edges.iter().any(|edge| edge.target == target)
    }
}
