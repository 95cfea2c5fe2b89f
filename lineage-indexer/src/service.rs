//! Lineage query and export API.
//!
//! Every request reads an immutable snapshot of the graph it targets, so
//! queries never wait on the ingestion path beyond a pointer clone.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::errors::QueryError;
use lineage_graph::serialize::{self, from_graphson, to_graphml, to_graphson};
use lineage_graph::{
    GraphRegistry, GraphStats, GraphStore, HistoryEntry, LineageGraph, MergeStats, Subgraph,
    TraversalEngine,
};
use lineage_shared::{GraphName, Scope, View};

/// Query, export and maintenance operations over a [`GraphRegistry`].
#[derive(Clone)]
pub struct LineageService {
    store: Arc<GraphRegistry>,
    engine: Arc<TraversalEngine>,
    dump_dir: PathBuf,
}

impl LineageService {
    pub fn new(store: Arc<GraphRegistry>, engine: TraversalEngine, dump_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            engine: Arc::new(engine),
            dump_dir: dump_dir.into(),
        }
    }

    pub fn store(&self) -> &Arc<GraphRegistry> {
        &self.store
    }

    pub fn dump_dir(&self) -> &Path {
        &self.dump_dir
    }

    /// Lineage of `guid` as a subgraph.
    pub fn lineage_subgraph(
        &self,
        graph: GraphName,
        scope: Scope,
        view: View,
        guid: &str,
    ) -> Result<Subgraph, QueryError> {
        let snapshot = self.store.read(graph)?;
        Ok(self.engine.lineage(&snapshot, scope, view, guid)?)
    }

    /// Lineage of `guid` rendered as GraphSON.
    #[instrument(skip(self))]
    pub fn lineage(
        &self,
        graph: GraphName,
        scope: Scope,
        view: View,
        guid: &str,
    ) -> Result<String, QueryError> {
        let subgraph = self.lineage_subgraph(graph, scope, view, guid)?;
        Ok(to_graphson(&subgraph)?)
    }

    /// Same as [`lineage`](Self::lineage) with every argument given as text,
    /// e.g. `("main", "ULTIMATE_SOURCE", "table-view", guid)`.
    pub fn query(&self, graph: &str, scope: &str, view: &str, guid: &str) -> Result<String, QueryError> {
        self.lineage(graph.parse()?, scope.parse()?, view.parse()?, guid)
    }

    /// Lineage of `guid` in the HISTORY entry with the given version.
    pub fn lineage_at_version(
        &self,
        version: u64,
        scope: Scope,
        view: View,
        guid: &str,
    ) -> Result<String, QueryError> {
        let entry = self.store.history_at(version)?;
        let subgraph = self.engine.lineage(&entry.graph, scope, view, guid)?;
        Ok(to_graphson(&subgraph)?)
    }

    /// The whole graph as GraphSON.
    pub fn export_graph(&self, graph: GraphName) -> Result<String, QueryError> {
        let snapshot = self.store.read(graph)?;
        Ok(to_graphson(snapshot.as_ref())?)
    }

    /// The whole graph as a GraphML document.
    pub fn export_graphml(&self, graph: GraphName) -> Result<String, QueryError> {
        let snapshot = self.store.read(graph)?;
        Ok(to_graphml(snapshot.as_ref(), graph.as_str())?)
    }

    /// Write the graph as GraphML into the dump directory. Returns the path
    /// of the written file.
    #[instrument(skip(self))]
    pub async fn dump_graph(&self, graph: GraphName) -> Result<PathBuf, QueryError> {
        let snapshot = self.store.read(graph)?;
        let dir = self.dump_dir.clone();

        tokio::task::spawn_blocking(move || serialize::dump_graph(&snapshot, graph, &dir))
            .await
            .map_err(|e| QueryError::Task(e.to_string()))?
            .map_err(QueryError::from)
    }

    /// Merge a GraphSON document into a writable graph.
    #[instrument(skip(self, document))]
    pub fn import_graph(&self, graph: GraphName, document: &str) -> Result<MergeStats, QueryError> {
        let imported: LineageGraph = from_graphson(document)?;
        Ok(self.store.import(graph, &imported)?)
    }

    /// Freeze the current state of `graph` into HISTORY.
    pub fn snapshot(&self, graph: GraphName) -> Result<u64, QueryError> {
        let version = self.store.snapshot(graph)?;
        info!(graph = %graph, version, "Snapshot taken");
        Ok(version)
    }

    pub fn history(&self) -> Result<Vec<HistoryEntry>, QueryError> {
        Ok(self.store.history()?)
    }

    /// Merge BUFFER into MAIN.
    pub fn promote_buffer(&self) -> Result<MergeStats, QueryError> {
        Ok(self.store.promote_buffer()?)
    }

    pub fn stats(&self, graph: GraphName) -> Result<GraphStats, QueryError> {
        Ok(self.store.stats(graph)?)
    }
}
