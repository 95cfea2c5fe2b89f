use super::{Direction, EdgeId, MergeStats, UpsertOutcome, VertexId};
use crate::context::AssetContext;
use crate::errors::StoreError;
use lineage_shared::{Edge, EdgeKey, LineageEntity};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub(super) struct EdgeSlot {
    pub(super) edge: Edge,
    pub(super) from: VertexId,
    pub(super) to: VertexId,
}

/// In-memory lineage property graph
///
/// Removed vertices and edges leave empty slots behind so indices handed
/// out earlier never point at a different element. The slots are only
/// reclaimed by [`LineageGraph::compact`], which renumbers everything.
#[derive(Debug, Clone, Default)]
pub struct LineageGraph {
    pub(super) vertices: Vec<Option<LineageEntity>>,
    pub(super) edges: Vec<Option<EdgeSlot>>,
    pub(super) guid_index: HashMap<String, VertexId>,
    pub(super) edge_index: HashMap<EdgeKey, EdgeId>,
    pub(super) outgoing: Vec<Vec<EdgeId>>,
    pub(super) incoming: Vec<Vec<EdgeId>>,
}

fn dangling(edge: &Edge, missing: &str) -> StoreError {
    StoreError::DanglingEdge {
        from: edge.from.clone(),
        to: edge.to.clone(),
        label: edge.label.clone(),
        missing: missing.to_string(),
    }
}

impl LineageGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.guid_index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guid_index.is_empty()
    }

    pub fn vertex_id(&self, guid: &str) -> Option<VertexId> {
        self.guid_index.get(guid).copied()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&LineageEntity> {
        self.vertices.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_vertex(&self, guid: &str) -> Option<&LineageEntity> {
        self.vertex_id(guid).and_then(|id| self.vertex(id))
    }

    pub fn contains_vertex(&self, guid: &str) -> bool {
        self.guid_index.contains_key(guid)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges
            .get(id.0)
            .and_then(Option::as_ref)
            .map(|slot| &slot.edge)
    }

    /// Source and target vertex of an edge.
    pub fn endpoints(&self, id: EdgeId) -> Option<(VertexId, VertexId)> {
        self.edges
            .get(id.0)
            .and_then(Option::as_ref)
            .map(|slot| (slot.from, slot.to))
    }

    pub fn get_edge(&self, key: &EdgeKey) -> Option<&Edge> {
        self.edge_index.get(key).and_then(|&id| self.edge(id))
    }

    pub fn contains_edge(&self, key: &EdgeKey) -> bool {
        self.edge_index.contains_key(key)
    }

    /// Live vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &LineageEntity> + '_ {
        self.vertices.iter().flatten()
    }

    /// Live vertex ids in insertion order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| VertexId(i))
    }

    /// Live edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().flatten().map(|slot| &slot.edge)
    }

    /// Edges leaving `id`, in insertion order.
    pub fn outgoing(&self, id: VertexId) -> &[EdgeId] {
        self.outgoing.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges entering `id`, in insertion order.
    pub fn incoming(&self, id: VertexId) -> &[EdgeId] {
        self.incoming.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges touching `guid` in the given direction. Unknown GUIDs have no
    /// neighbours.
    pub fn neighbors(&self, guid: &str, direction: Direction) -> Vec<&Edge> {
        let Some(id) = self.vertex_id(guid) else {
            return Vec::new();
        };
        let ids: Vec<EdgeId> = match direction {
            Direction::Outgoing => self.outgoing(id).to_vec(),
            Direction::Incoming => self.incoming(id).to_vec(),
            Direction::Both => {
                let mut ids = self.outgoing(id).to_vec();
                // A self-loop is both outgoing and incoming; report it once
                for edge_id in self.incoming(id) {
                    if !ids.contains(edge_id) {
                        ids.push(*edge_id);
                    }
                }
                ids
            }
        };
        ids.into_iter().filter_map(|e| self.edge(e)).collect()
    }

    fn push_vertex(&mut self, entity: LineageEntity) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.guid_index.insert(entity.guid.clone(), id);
        self.vertices.push(Some(entity));
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Insert a vertex unless its GUID is already present.
    pub fn add_vertex(&mut self, entity: LineageEntity) -> bool {
        if self.contains_vertex(&entity.guid) {
            return false;
        }
        self.push_vertex(entity);
        true
    }

    /// Insert a vertex, or update the type and properties of the existing
    /// vertex with the same GUID. Incoming property values win; properties
    /// absent from `entity` are kept.
    pub fn upsert_vertex(&mut self, entity: LineageEntity) -> UpsertOutcome {
        let Some(id) = self.vertex_id(&entity.guid) else {
            self.push_vertex(entity);
            return UpsertOutcome::Inserted;
        };
        let Some(existing) = self.vertices.get_mut(id.0).and_then(Option::as_mut) else {
            return UpsertOutcome::Unchanged;
        };

        let mut changed = false;
        if existing.type_name != entity.type_name {
            existing.type_name = entity.type_name;
            changed = true;
        }
        for (key, value) in entity.properties {
            if existing.properties.get(&key) != Some(&value) {
                existing.properties.insert(key, value);
                changed = true;
            }
        }

        if changed {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Unchanged
        }
    }

    /// Insert an edge unless its `(from, to, label)` is already present.
    /// Edges are never updated. Both endpoints must already exist.
    pub fn insert_edge(&mut self, edge: Edge) -> Result<bool, StoreError> {
        let key = edge.key();
        if self.edge_index.contains_key(&key) {
            return Ok(false);
        }

        let from = self
            .vertex_id(&edge.from)
            .ok_or_else(|| dangling(&edge, &edge.from))?;
        let to = self
            .vertex_id(&edge.to)
            .ok_or_else(|| dangling(&edge, &edge.to))?;

        let id = EdgeId(self.edges.len());
        self.outgoing[from.0].push(id);
        self.incoming[to.0].push(id);
        self.edge_index.insert(key, id);
        self.edges.push(Some(EdgeSlot { edge, from, to }));
        Ok(true)
    }

    /// Remove a vertex and every edge referencing it, from both endpoints'
    /// index entries. Returns the removed vertex and edges.
    pub fn remove_vertex(&mut self, guid: &str) -> Option<(LineageEntity, Vec<Edge>)> {
        let id = self.guid_index.remove(guid)?;
        let entity = self.vertices.get_mut(id.0).and_then(Option::take)?;

        let mut edge_ids = std::mem::take(&mut self.outgoing[id.0]);
        for edge_id in std::mem::take(&mut self.incoming[id.0]) {
            if !edge_ids.contains(&edge_id) {
                edge_ids.push(edge_id);
            }
        }

        let mut removed = Vec::with_capacity(edge_ids.len());
        for edge_id in edge_ids {
            let Some(slot) = self.edges.get_mut(edge_id.0).and_then(Option::take) else {
                continue;
            };
            self.edge_index.remove(&slot.edge.key());
            self.outgoing[slot.from.0].retain(|e| *e != edge_id);
            self.incoming[slot.to.0].retain(|e| *e != edge_id);
            removed.push(slot.edge);
        }

        Some((entity, removed))
    }

    /// Number of slots left empty by removals.
    pub fn empty_slots(&self) -> usize {
        (self.vertices.len() - self.guid_index.len()) + (self.edges.len() - self.edge_index.len())
    }

    /// Rebuild the arena without empty slots, keeping the relative order
    /// of vertices and edges. Every previously issued index is invalidated.
    pub fn compact(&mut self) {
        if self.empty_slots() == 0 {
            return;
        }

        let mut compacted = LineageGraph::new();
        for entity in std::mem::take(&mut self.vertices).into_iter().flatten() {
            compacted.push_vertex(entity);
        }
        for slot in std::mem::take(&mut self.edges).into_iter().flatten() {
            let (Some(from), Some(to)) = (
                compacted.vertex_id(&slot.edge.from),
                compacted.vertex_id(&slot.edge.to),
            ) else {
                continue;
            };
            let id = EdgeId(compacted.edges.len());
            compacted.outgoing[from.0].push(id);
            compacted.incoming[to.0].push(id);
            compacted.edge_index.insert(slot.edge.key(), id);
            compacted.edges.push(Some(EdgeSlot {
                edge: slot.edge,
                from,
                to,
            }));
        }
        *self = compacted;
    }

    /// Merge a staging subgraph: vertices are upserted, edges inserted if
    /// absent. Every edge is checked before anything is written, so a
    /// rejected merge leaves the graph unchanged.
    pub fn merge(&mut self, context: &AssetContext) -> Result<MergeStats, StoreError> {
        for edge in context.edges() {
            for endpoint in [&edge.from, &edge.to] {
                if !context.contains_vertex(endpoint) && !self.contains_vertex(endpoint) {
                    return Err(dangling(edge, endpoint));
                }
            }
        }

        let mut stats = MergeStats::default();
        for vertex in context.vertices() {
            match self.upsert_vertex(vertex.clone()) {
                UpsertOutcome::Inserted => stats.vertices_inserted += 1,
                UpsertOutcome::Updated => stats.vertices_updated += 1,
                UpsertOutcome::Unchanged => {}
            }
        }
        for edge in context.edges() {
            if self.insert_edge(edge.clone())? {
                stats.edges_inserted += 1;
            }
        }
        Ok(stats)
    }

    /// Merge another graph into this one with the same semantics as
    /// [`merge`](Self::merge).
    pub fn merge_graph(&mut self, other: &LineageGraph) -> Result<MergeStats, StoreError> {
        let mut stats = MergeStats::default();
        for vertex in other.vertices() {
            match self.upsert_vertex(vertex.clone()) {
                UpsertOutcome::Inserted => stats.vertices_inserted += 1,
                UpsertOutcome::Updated => stats.vertices_updated += 1,
                UpsertOutcome::Unchanged => {}
            }
        }
        for edge in other.edges() {
            if self.insert_edge(edge.clone())? {
                stats.edges_inserted += 1;
            }
        }
        Ok(stats)
    }

    /// Check that the lookup tables and adjacency indexes are an exact
    /// projection of the live vertices and edges.
    pub fn is_consistent(&self) -> bool {
        let live_vertices = self.vertices.iter().flatten().count();
        if live_vertices != self.guid_index.len() {
            return false;
        }
        let vertices_indexed = self
            .guid_index
            .iter()
            .all(|(guid, &id)| self.vertex(id).is_some_and(|v| v.guid == *guid));

        let live_edges = self.edges.iter().flatten().count();
        let outgoing_total: usize = self.outgoing.iter().map(Vec::len).sum();
        let incoming_total: usize = self.incoming.iter().map(Vec::len).sum();
        if live_edges != self.edge_index.len()
            || outgoing_total != live_edges
            || incoming_total != live_edges
        {
            return false;
        }

        let edges_indexed = self.edges.iter().enumerate().all(|(i, slot)| {
            let Some(slot) = slot else {
                return true;
            };
            let id = EdgeId(i);
            self.edge_index.get(&slot.edge.key()) == Some(&id)
                && self.outgoing[slot.from.0].iter().filter(|e| **e == id).count() == 1
                && self.incoming[slot.to.0].iter().filter(|e| **e == id).count() == 1
                && self.vertex(slot.from).is_some_and(|v| v.guid == slot.edge.from)
                && self.vertex(slot.to).is_some_and(|v| v.guid == slot.edge.to)
        });

        vertices_indexed && edges_indexed
    }
}
