//! In-memory registry of the named graphs.
//!
//! Each writable graph sits behind an `RwLock<Arc<LineageGraph>>`. Readers
//! clone the `Arc` and release the lock immediately, so a query keeps a
//! frozen snapshot for as long as it needs. Writers take the write lock for
//! the duration of one operation and mutate through `Arc::make_mut`, which
//! copies the graph only while some reader still holds the previous version.

use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use super::{GraphStats, GraphStore};
use crate::context::AssetContext;
use crate::errors::StoreError;
use crate::graph::{Direction, LineageGraph, MergeStats, UpsertOutcome};
use lineage_shared::{Edge, GraphName, LineageEntity};

/// A frozen copy of a graph appended to HISTORY.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub version: u64,
    pub taken_at: DateTime<Utc>,
    pub source: GraphName,
    pub graph: Arc<LineageGraph>,
}

#[derive(Debug)]
struct GraphHandle {
    name: GraphName,
    current: RwLock<Arc<LineageGraph>>,
}

impl GraphHandle {
    fn new(name: GraphName) -> Self {
        Self {
            name,
            current: RwLock::new(Arc::new(LineageGraph::new())),
        }
    }

    fn read(&self) -> Result<Arc<LineageGraph>, StoreError> {
        self.current
            .read()
            .map(|graph| Arc::clone(&graph))
            .map_err(|_| StoreError::LockPoisoned(self.name))
    }

    fn write<T>(
        &self,
        op: impl FnOnce(&mut LineageGraph) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut current = self
            .current
            .write()
            .map_err(|_| StoreError::LockPoisoned(self.name))?;
        op(Arc::make_mut(&mut current))
    }

    fn replace(&self, graph: LineageGraph) -> Result<(), StoreError> {
        let mut current = self
            .current
            .write()
            .map_err(|_| StoreError::LockPoisoned(self.name))?;
        *current = Arc::new(graph);
        Ok(())
    }
}

/// The four named graphs of the lineage store.
///
/// Constructed once at startup and shared by `Arc` with the ingestion
/// pipeline and the query service.
#[derive(Debug)]
pub struct GraphRegistry {
    main: GraphHandle,
    buffer: GraphHandle,
    mock: GraphHandle,
    history: RwLock<Vec<HistoryEntry>>,
}

impl Default for GraphRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self {
            main: GraphHandle::new(GraphName::Main),
            buffer: GraphHandle::new(GraphName::Buffer),
            mock: GraphHandle::new(GraphName::Mock),
            history: RwLock::new(Vec::new()),
        }
    }

    fn handle(&self, graph: GraphName) -> Result<&GraphHandle, StoreError> {
        match graph {
            GraphName::Main => Ok(&self.main),
            GraphName::Buffer => Ok(&self.buffer),
            GraphName::Mock => Ok(&self.mock),
            GraphName::History => Err(StoreError::ReadOnly(GraphName::History)),
        }
    }

    /// All history entries, oldest first.
    pub fn history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        self.history
            .read()
            .map(|entries| entries.clone())
            .map_err(|_| StoreError::LockPoisoned(GraphName::History))
    }

    /// The history entry with the given version.
    pub fn history_at(&self, version: u64) -> Result<HistoryEntry, StoreError> {
        let entries = self
            .history
            .read()
            .map_err(|_| StoreError::LockPoisoned(GraphName::History))?;
        entries
            .iter()
            .find(|entry| entry.version == version)
            .cloned()
            .ok_or(StoreError::HistoryNotFound(version))
    }

    /// Drop every vertex and edge of a writable graph.
    pub fn clear(&self, graph: GraphName) -> Result<(), StoreError> {
        self.handle(graph)?.replace(LineageGraph::new())?;
        debug!(graph = %graph, "Cleared graph");
        Ok(())
    }

    /// Merge everything accumulated in BUFFER into MAIN and empty BUFFER.
    pub fn promote_buffer(&self) -> Result<MergeStats, StoreError> {
        // Lock order is always BUFFER then MAIN
        let mut buffer = self
            .buffer
            .current
            .write()
            .map_err(|_| StoreError::LockPoisoned(GraphName::Buffer))?;
        let stats = self
            .main
            .write(|main| main.merge_graph(&buffer))?;
        *buffer = Arc::new(LineageGraph::new());

        info!(
            vertices_inserted = stats.vertices_inserted,
            vertices_updated = stats.vertices_updated,
            edges_inserted = stats.edges_inserted,
            "Promoted BUFFER into MAIN"
        );
        Ok(stats)
    }

    /// Merge a complete graph (for instance a re-imported export) into a
    /// writable graph.
    pub fn import(&self, graph: GraphName, other: &LineageGraph) -> Result<MergeStats, StoreError> {
        let stats = self.handle(graph)?.write(|g| g.merge_graph(other))?;
        info!(
            graph = %graph,
            vertices_inserted = stats.vertices_inserted,
            edges_inserted = stats.edges_inserted,
            "Imported graph"
        );
        Ok(stats)
    }

    /// Vertex and edge counts of a graph.
    pub fn stats(&self, graph: GraphName) -> Result<GraphStats, StoreError> {
        Ok(GraphStats::from(self.read(graph)?.as_ref()))
    }
}

impl GraphStore for GraphRegistry {
    fn merge(&self, graph: GraphName, context: &AssetContext) -> Result<MergeStats, StoreError> {
        let stats = self.handle(graph)?.write(|g| g.merge(context))?;
        debug!(
            graph = %graph,
            vertices_inserted = stats.vertices_inserted,
            vertices_updated = stats.vertices_updated,
            edges_inserted = stats.edges_inserted,
            "Merged subgraph"
        );
        Ok(stats)
    }

    fn upsert_vertex(
        &self,
        graph: GraphName,
        entity: LineageEntity,
    ) -> Result<UpsertOutcome, StoreError> {
        self.handle(graph)?.write(|g| Ok(g.upsert_vertex(entity)))
    }

    fn upsert_edge(&self, graph: GraphName, edge: Edge) -> Result<bool, StoreError> {
        self.handle(graph)?.write(|g| g.insert_edge(edge))
    }

    fn get_vertex(&self, graph: GraphName, guid: &str) -> Result<Option<LineageEntity>, StoreError> {
        Ok(self.read(graph)?.get_vertex(guid).cloned())
    }

    fn neighbors(
        &self,
        graph: GraphName,
        guid: &str,
        direction: Direction,
    ) -> Result<Vec<Edge>, StoreError> {
        let snapshot = self.read(graph)?;
        if !snapshot.contains_vertex(guid) {
            return Err(StoreError::VertexNotFound {
                graph,
                guid: guid.to_string(),
            });
        }
        Ok(snapshot
            .neighbors(guid, direction)
            .into_iter()
            .cloned()
            .collect())
    }

    fn remove_vertex(&self, graph: GraphName, guid: &str) -> Result<Vec<Edge>, StoreError> {
        self.handle(graph)?.write(|g| {
            let (_, edges) = g.remove_vertex(guid).ok_or_else(|| StoreError::VertexNotFound {
                graph,
                guid: guid.to_string(),
            })?;
            if g.empty_slots() > g.vertex_count() + g.edge_count() {
                g.compact();
            }
            Ok(edges)
        })
    }

    fn snapshot(&self, graph: GraphName) -> Result<u64, StoreError> {
        let frozen = self.handle(graph)?.read()?;
        let mut entries = self
            .history
            .write()
            .map_err(|_| StoreError::LockPoisoned(GraphName::History))?;

        let version = entries.last().map_or(1, |entry| entry.version + 1);
        info!(
            source = %graph,
            version,
            vertex_count = frozen.vertex_count(),
            edge_count = frozen.edge_count(),
            "Appended graph snapshot to HISTORY"
        );
        entries.push(HistoryEntry {
            version,
            taken_at: Utc::now(),
            source: graph,
            graph: frozen,
        });
        Ok(version)
    }

    fn read(&self, graph: GraphName) -> Result<Arc<LineageGraph>, StoreError> {
        match graph {
            GraphName::History => {
                let entries = self
                    .history
                    .read()
                    .map_err(|_| StoreError::LockPoisoned(GraphName::History))?;
                Ok(entries
                    .last()
                    .map(|entry| Arc::clone(&entry.graph))
                    .unwrap_or_default())
            }
            _ => self.handle(graph)?.read(),
        }
    }
}
