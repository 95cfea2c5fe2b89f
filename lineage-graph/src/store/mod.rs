//! Graph store: the named graphs and the operations on them.
//!
//! `GraphStore` is the seam the ingestion pipeline writes through;
//! `GraphRegistry` is the in-memory implementation holding MAIN, BUFFER,
//! MOCK and HISTORY.

mod registry;

pub use registry::{GraphRegistry, HistoryEntry};

use std::sync::Arc;

use crate::context::AssetContext;
use crate::errors::StoreError;
use crate::graph::{memory, Direction, LineageGraph, MergeStats, UpsertOutcome};
use lineage_shared::{Edge, GraphName, LineageEntity};

/// Size of a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub vertex_count: usize,
    pub edge_count: usize,
    /// Estimated heap usage, see [`memory::graph_size`].
    pub memory_bytes: usize,
}

impl From<&LineageGraph> for GraphStats {
    fn from(graph: &LineageGraph) -> Self {
        Self {
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
            memory_bytes: memory::graph_size(graph).total_bytes,
        }
    }
}

/// Operations on the named lineage graphs.
///
/// Writes to one graph are serialized; reads return an immutable snapshot
/// that later writes never alter.
pub trait GraphStore: Send + Sync {
    /// Merge a staging subgraph atomically: upsert its vertices, insert its
    /// edges if absent.
    fn merge(&self, graph: GraphName, context: &AssetContext) -> Result<MergeStats, StoreError>;

    fn upsert_vertex(
        &self,
        graph: GraphName,
        entity: LineageEntity,
    ) -> Result<UpsertOutcome, StoreError>;

    /// Insert an edge if absent. Returns whether it was new.
    fn upsert_edge(&self, graph: GraphName, edge: Edge) -> Result<bool, StoreError>;

    fn get_vertex(&self, graph: GraphName, guid: &str) -> Result<Option<LineageEntity>, StoreError>;

    /// Edges touching `guid` in the given direction.
    fn neighbors(
        &self,
        graph: GraphName,
        guid: &str,
        direction: Direction,
    ) -> Result<Vec<Edge>, StoreError>;

    /// Remove a vertex and every edge referencing it. Returns the removed
    /// edges.
    fn remove_vertex(&self, graph: GraphName, guid: &str) -> Result<Vec<Edge>, StoreError>;

    /// Append the current state of `graph` to HISTORY. Returns the new
    /// history version.
    fn snapshot(&self, graph: GraphName) -> Result<u64, StoreError>;

    /// A consistent point-in-time view of `graph`.
    fn read(&self, graph: GraphName) -> Result<Arc<LineageGraph>, StoreError>;
}
