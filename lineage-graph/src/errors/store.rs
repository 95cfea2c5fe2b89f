//! Errors raised by graph store operations.

use lineage_shared::GraphName;
use thiserror::Error;

/// Errors from the graph store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// An edge references a vertex that is neither in the graph nor in the
    /// subgraph being merged.
    #[error("Edge {from} -[{label}]-> {to} references missing vertex {missing}")]
    DanglingEdge {
        from: String,
        to: String,
        label: String,
        missing: String,
    },

    /// The vertex does not exist in the graph.
    #[error("Vertex not found in {graph}: {guid}")]
    VertexNotFound { graph: GraphName, guid: String },

    /// The graph only accepts snapshots, not direct writes.
    #[error("Graph {0} is read-only")]
    ReadOnly(GraphName),

    /// No history entry exists for the requested version.
    #[error("History version not found: {0}")]
    HistoryNotFound(u64),

    /// A lock guarding the graph was poisoned by a panicking writer.
    #[error("Graph {0} lock poisoned")]
    LockPoisoned(GraphName),

    /// The store is temporarily unable to serve the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether retrying the same operation later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
