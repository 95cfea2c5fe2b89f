//! Lineage Graph - property graph store for data lineage
//!
//! Holds the lineage graph and answers scoped lineage queries over it:
//! - `AssetContext`: disposable staging graph assembled from one event
//! - `LineageGraph`: arena-backed property graph with adjacency indexes
//! - `GraphRegistry`: the MAIN, BUFFER, MOCK and HISTORY named graphs
//! - `TraversalEngine`: ultimate source/destination, end-to-end, one-hop
//!   and glossary traversals with view-based collapsing
//! - `serialize`: GraphSON and GraphML interchange formats

pub mod context;
pub mod errors;
pub mod graph;
pub mod serialize;
pub mod store;
pub mod traversal;

pub use context::AssetContext;
pub use errors::{SerializeError, StoreError, TraversalError};
pub use graph::{Direction, EdgeId, LineageGraph, MergeStats, UpsertOutcome, VertexId};
pub use store::{GraphRegistry, GraphStats, GraphStore, HistoryEntry};
pub use traversal::{CyclePolicy, Subgraph, TraversalConfig, TraversalEngine, ViewCollapser};
