use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::PropertyGraph;
use crate::errors::SerializeError;
use crate::graph::LineageGraph;
use lineage_shared::{Edge, LineageEntity, Properties};

/// GraphSON document: `{ "vertices": [...], "edges": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSon {
    #[serde(default)]
    pub vertices: Vec<GraphSonVertex>,
    #[serde(default)]
    pub edges: Vec<GraphSonEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSonVertex {
    /// Vertex GUID
    pub id: String,
    /// Entity type name
    pub label: String,
    #[serde(default)]
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSonEdge {
    pub id: String,
    /// Relationship type
    pub label: String,
    #[serde(rename = "outV")]
    pub out_v: String,
    #[serde(rename = "inV")]
    pub in_v: String,
    #[serde(default)]
    pub properties: Properties,
}

impl From<&LineageEntity> for GraphSonVertex {
    fn from(entity: &LineageEntity) -> Self {
        Self {
            id: entity.guid.clone(),
            label: entity.type_name.clone(),
            properties: entity.properties.clone(),
        }
    }
}

impl From<&Edge> for GraphSonEdge {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id(),
            label: edge.label.clone(),
            out_v: edge.from.clone(),
            in_v: edge.to.clone(),
            properties: edge.properties.clone(),
        }
    }
}

impl GraphSon {
    pub fn from_graph(graph: &dyn PropertyGraph) -> Self {
        Self {
            vertices: graph.graph_vertices().map(GraphSonVertex::from).collect(),
            edges: graph.graph_edges().map(GraphSonEdge::from).collect(),
        }
    }

    /// Rebuild a graph. Duplicate vertex ids and edges with a missing
    /// endpoint are rejected; edge ids are derived, not trusted.
    pub fn into_graph(self) -> Result<LineageGraph, SerializeError> {
        let mut graph = LineageGraph::new();
        let mut ids = HashSet::new();

        for vertex in self.vertices {
            if !ids.insert(vertex.id.clone()) {
                return Err(SerializeError::InvalidGraph(format!(
                    "duplicate vertex id {}",
                    vertex.id
                )));
            }
            graph.add_vertex(LineageEntity {
                guid: vertex.id,
                type_name: vertex.label,
                properties: vertex.properties,
            });
        }

        for edge in self.edges {
            let edge = Edge {
                from: edge.out_v,
                to: edge.in_v,
                label: edge.label,
                properties: edge.properties,
            };
            graph
                .insert_edge(edge)
                .map_err(|e| SerializeError::InvalidGraph(e.to_string()))?;
        }
        Ok(graph)
    }
}

/// Render a graph or query result as a GraphSON string.
pub fn to_graphson(graph: &dyn PropertyGraph) -> Result<String, SerializeError> {
    Ok(serde_json::to_string(&GraphSon::from_graph(graph))?)
}

/// Parse a GraphSON string back into a graph.
pub fn from_graphson(document: &str) -> Result<LineageGraph, SerializeError> {
    let parsed: GraphSon = serde_json::from_str(document)?;
    parsed.into_graph()
}
