//! Memory size estimation for lineage graphs
//!
//! Approximates the heap usage of a `LineageGraph`. Used for progress
//! logging and benchmarks.
//!
//! # Example
//!
//! ```
//! use lineage_graph::graph::memory;
//! use lineage_graph::LineageGraph;
//!
//! let graph = LineageGraph::new();
//! let breakdown = memory::graph_size(&graph);
//! println!("graph uses {}", memory::format_bytes(breakdown.total_bytes));
//! ```

use super::{EdgeId, LineageGraph, VertexId};
use lineage_shared::{Edge, EdgeKey, LineageEntity, Properties};
use std::collections::HashMap;
use std::mem;

/// Per-entry overhead assumed for hash tables
const TABLE_ENTRY_OVERHEAD: usize = 16;

/// Memory breakdown for a LineageGraph
#[derive(Debug, Clone, Default)]
pub struct GraphMemory {
    pub total_bytes: usize,
    pub vertices_bytes: usize,
    pub edges_bytes: usize,
    pub guid_index_bytes: usize,
    pub edge_index_bytes: usize,
    pub adjacency_bytes: usize,
}

/// Calculate memory usage of a LineageGraph
pub fn graph_size(graph: &LineageGraph) -> GraphMemory {
    let vertices_bytes = graph.vertices.capacity() * mem::size_of::<Option<LineageEntity>>()
        + graph.vertices().map(entity_heap_size).sum::<usize>();

    let edges_bytes = graph.edges.capacity() * mem::size_of::<Option<super::arena::EdgeSlot>>()
        + graph.edges().map(edge_heap_size).sum::<usize>();

    let guid_index_bytes = hashmap_size::<String, VertexId>(&graph.guid_index)
        + graph.guid_index.keys().map(String::capacity).sum::<usize>();

    let edge_index_bytes = hashmap_size::<EdgeKey, EdgeId>(&graph.edge_index)
        + graph
            .edge_index
            .keys()
            .map(|k| k.from.capacity() + k.to.capacity() + k.label.capacity())
            .sum::<usize>();

    let adjacency_bytes = nested_vec_size(&graph.outgoing) + nested_vec_size(&graph.incoming);

    GraphMemory {
        total_bytes: vertices_bytes
            + edges_bytes
            + guid_index_bytes
            + edge_index_bytes
            + adjacency_bytes,
        vertices_bytes,
        edges_bytes,
        guid_index_bytes,
        edge_index_bytes,
        adjacency_bytes,
    }
}

fn properties_heap_size(properties: &Properties) -> usize {
    properties
        .iter()
        .map(|(k, v)| k.capacity() + v.capacity() + 2 * mem::size_of::<String>())
        .sum()
}

fn entity_heap_size(entity: &LineageEntity) -> usize {
    entity.guid.capacity() + entity.type_name.capacity() + properties_heap_size(&entity.properties)
}

fn edge_heap_size(edge: &Edge) -> usize {
    edge.from.capacity()
        + edge.to.capacity()
        + edge.label.capacity()
        + properties_heap_size(&edge.properties)
}

fn hashmap_size<K, V>(map: &HashMap<K, V>) -> usize {
    map.capacity() * (mem::size_of::<K>() + mem::size_of::<V>() + TABLE_ENTRY_OVERHEAD)
}

#[allow(clippy::ptr_arg)]
fn nested_vec_size(lists: &Vec<Vec<EdgeId>>) -> usize {
    lists.capacity() * mem::size_of::<Vec<EdgeId>>()
        + lists
            .iter()
            .map(|l| l.capacity() * mem::size_of::<EdgeId>())
            .sum::<usize>()
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;
    const GB: usize = 1024 * MB;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Average bytes per vertex
pub fn bytes_per_vertex(graph: &LineageGraph) -> f64 {
    let vertices = graph.vertex_count();
    if vertices == 0 {
        0.0
    } else {
        graph_size(graph).total_bytes as f64 / vertices as f64
    }
}
