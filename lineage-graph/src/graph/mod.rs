//! Arena-backed lineage property graph
//!
//! Vertices and edges live in vectors and are addressed by stable numeric
//! indices. Lookup tables map GUIDs and edge keys to those indices, and two
//! derived indexes hold the outgoing and incoming edges of every vertex in
//! insertion order, which keeps traversal output deterministic.

mod arena;
pub mod memory;

pub use arena::LineageGraph;

/// Stable index of a vertex within one `LineageGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) usize);

/// Stable index of an edge within one `LineageGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which edges of a vertex to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

/// Result of upserting a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Unchanged,
}

/// Counts from merging a subgraph into a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub vertices_inserted: usize,
    pub vertices_updated: usize,
    pub edges_inserted: usize,
}

impl MergeStats {
    /// Whether the merge changed anything.
    pub fn is_noop(&self) -> bool {
        self.vertices_inserted == 0 && self.vertices_updated == 0 && self.edges_inserted == 0
    }
}
