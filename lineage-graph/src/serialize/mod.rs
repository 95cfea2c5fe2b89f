//! Property-graph interchange formats
//!
//! - GraphSON: JSON vertex and edge arrays, used for query results and
//!   whole-graph exports, and re-importable into a `LineageGraph`
//! - GraphML: XML document, used for full-graph dumps to disk
//!
//! Both render anything implementing [`PropertyGraph`] and emit elements in
//! the order the source yields them.

mod dump;
mod graphml;
mod graphson;

pub use dump::{dump_graph, dump_path};
pub use graphml::{to_graphml, write_graphml};
pub use graphson::{from_graphson, to_graphson, GraphSon, GraphSonEdge, GraphSonVertex};

use crate::graph::LineageGraph;
use crate::traversal::Subgraph;
use lineage_shared::{Edge, LineageEntity};

/// A vertex and edge collection that can be serialized.
pub trait PropertyGraph {
    fn graph_vertices(&self) -> Box<dyn Iterator<Item = &LineageEntity> + '_>;
    fn graph_edges(&self) -> Box<dyn Iterator<Item = &Edge> + '_>;
}

impl PropertyGraph for LineageGraph {
    fn graph_vertices(&self) -> Box<dyn Iterator<Item = &LineageEntity> + '_> {
        Box::new(self.vertices())
    }

    fn graph_edges(&self) -> Box<dyn Iterator<Item = &Edge> + '_> {
        Box::new(self.edges())
    }
}

impl PropertyGraph for Subgraph {
    fn graph_vertices(&self) -> Box<dyn Iterator<Item = &LineageEntity> + '_> {
        Box::new(self.vertices.iter())
    }

    fn graph_edges(&self) -> Box<dyn Iterator<Item = &Edge> + '_> {
        Box::new(self.edges.iter())
    }
}
