//! Local subgraph assembled while processing a single lineage event.
//!
//! An `AssetContext` is pure in-memory staging: vertices and edges are
//! collected here, then merged into a named graph and discarded.

use lineage_shared::{Edge, EdgeKey, LineageEntity};
use std::collections::{HashMap, HashSet};

/// Staging graph for one event, with its own adjacency index.
#[derive(Debug, Clone, Default)]
pub struct AssetContext {
    vertices: Vec<LineageEntity>,
    vertex_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_keys: HashSet<EdgeKey>,
    /// Source GUID → positions in `edges`, in insertion order
    neighbors: HashMap<String, Vec<usize>>,
}

impl AssetContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vertex unless one with the same GUID is already present.
    ///
    /// Returns `false` (and leaves the context untouched) for a duplicate.
    pub fn add_vertex(&mut self, entity: LineageEntity) -> bool {
        if self.vertex_index.contains_key(&entity.guid) {
            return false;
        }
        self.vertex_index
            .insert(entity.guid.clone(), self.vertices.len());
        self.vertices.push(entity);
        true
    }

    /// Insert an edge unless an edge with the same `(from, to, label)` is
    /// already present. The adjacency entry of the source is only touched
    /// when the edge is new.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if !self.edge_keys.insert(edge.key()) {
            return false;
        }
        self.neighbors
            .entry(edge.from.clone())
            .or_default()
            .push(self.edges.len());
        self.edges.push(edge);
        true
    }

    pub fn vertex(&self, guid: &str) -> Option<&LineageEntity> {
        self.vertex_index.get(guid).map(|&i| &self.vertices[i])
    }

    pub fn contains_vertex(&self, guid: &str) -> bool {
        self.vertex_index.contains_key(guid)
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> &[LineageEntity] {
        &self.vertices
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Outgoing edges of `guid` in insertion order.
    pub fn neighbors(&self, guid: &str) -> impl Iterator<Item = &Edge> + '_ {
        self.neighbors
            .get(guid)
            .into_iter()
            .flatten()
            .map(|&i| &self.edges[i])
    }

    /// GUIDs that have an adjacency entry.
    pub fn sources(&self) -> impl Iterator<Item = &str> + '_ {
        self.neighbors.keys().map(String::as_str)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }

    /// Check that every edge sits in exactly its source's adjacency entry.
    pub fn is_consistent(&self) -> bool {
        let indexed: usize = self.neighbors.values().map(Vec::len).sum();
        indexed == self.edges.len()
            && self.neighbors.iter().all(|(guid, positions)| {
                !positions.is_empty() && positions.iter().all(|&i| self.edges[i].from == *guid)
            })
    }
}
