//! View collapsing: report a traversal result at host, table or column
//! granularity.

use std::collections::{HashMap, HashSet};

use super::Subgraph;
use crate::graph::LineageGraph;
use lineage_shared::relationships::{self, Granularity, CONTAINER_GUID};
use lineage_shared::{Edge, LineageEntity, View};

/// Replaces vertices finer than a view with their containers.
///
/// The container of a vertex is the source of its first incoming
/// containment edge whose type is coarser than the vertex, or failing that
/// the vertex named by its `containerGuid` property when that one is
/// coarser. Lookup repeats until the view's granularity is reached. A
/// vertex whose chain ends early is reported at the coarsest container
/// found, or as itself. Types with no granularity are never collapsed.
///
/// Column membership is never inferred from lineage edges: a column with
/// neither a containment edge nor a `containerGuid` property stays a column
/// in every view.
///
/// Edges whose two endpoints collapse into the same vertex are dropped.
/// Remaining edges are re-pointed at the reported vertices and
/// de-duplicated by `(from, to, label)`, keeping the first occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewCollapser {
    view: View,
}

impl ViewCollapser {
    pub fn new(view: View) -> Self {
        Self { view }
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// The vertex `guid` is reported as, or `None` if it is not in `graph`.
    pub fn representative<'g>(&self, graph: &'g LineageGraph, guid: &str) -> Option<&'g LineageEntity> {
        let mut current = graph.get_vertex(guid)?;
        let mut seen: HashSet<&str> = HashSet::from([current.guid.as_str()]);

        while let Some(granularity) = Granularity::of(&current.type_name) {
            if !granularity.finer_than(self.view) {
                break;
            }
            let Some(container) = container_of(graph, current, granularity) else {
                break;
            };
            if !seen.insert(container.guid.as_str()) {
                break;
            }
            current = container;
        }
        Some(current)
    }

    pub fn collapse(&self, graph: &LineageGraph, subgraph: Subgraph) -> Subgraph {
        let mut reported_as: HashMap<&str, &LineageEntity> = HashMap::new();
        let mut vertices = Vec::new();
        let mut emitted: HashSet<&str> = HashSet::new();

        for vertex in &subgraph.vertices {
            let target = self.representative(graph, &vertex.guid).unwrap_or(vertex);
            reported_as.insert(vertex.guid.as_str(), target);
            if emitted.insert(target.guid.as_str()) {
                vertices.push(target.clone());
            }
        }

        let mut keys = HashSet::new();
        let mut edges = Vec::new();
        for edge in &subgraph.edges {
            let from = reported_as
                .get(edge.from.as_str())
                .map_or(edge.from.as_str(), |v| v.guid.as_str());
            let to = reported_as
                .get(edge.to.as_str())
                .map_or(edge.to.as_str(), |v| v.guid.as_str());

            // A genuine self-loop stays; two vertices merged into one do not
            if from == to && edge.from != edge.to {
                continue;
            }
            let collapsed = Edge {
                from: from.to_string(),
                to: to.to_string(),
                label: edge.label.clone(),
                properties: edge.properties.clone(),
            };
            if keys.insert(collapsed.key()) {
                edges.push(collapsed);
            }
        }

        Subgraph { vertices, edges }
    }
}

fn container_of<'g>(
    graph: &'g LineageGraph,
    vertex: &LineageEntity,
    granularity: Granularity,
) -> Option<&'g LineageEntity> {
    let coarser = |candidate: &&'g LineageEntity| {
        Granularity::of(&candidate.type_name).is_some_and(|g| g < granularity)
    };

    let id = graph.vertex_id(&vertex.guid)?;
    graph
        .incoming(id)
        .iter()
        .filter_map(|&e| graph.edge(e))
        .filter(|e| relationships::is_containment(&e.label))
        .filter_map(|e| graph.get_vertex(&e.from))
        .find(coarser)
        .or_else(|| {
            vertex
                .property(CONTAINER_GUID)
                .and_then(|guid| graph.get_vertex(guid))
                .filter(coarser)
        })
}
