//! Back-edge detection for `CyclePolicy::OmitBackEdges`.

use std::collections::{HashMap, HashSet};

use super::Selection;
use crate::graph::{Direction, EdgeId, LineageGraph, VertexId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnStack,
    Done,
}

/// Edges of `selection` that close a directed cycle.
///
/// Depth-first walk over the selected edges, oriented by `direction`
/// (`Incoming` walks edges from head to tail). The walk starts at `start`
/// and then at every unvisited selected vertex in discovery order. An edge
/// leading to a vertex still on the walk stack is a back edge; removing all
/// of them leaves the selection acyclic.
pub(super) fn back_edges(
    graph: &LineageGraph,
    selection: &Selection,
    start: VertexId,
    direction: Direction,
) -> HashSet<EdgeId> {
    let mut adjacency: HashMap<VertexId, Vec<(EdgeId, VertexId)>> = HashMap::new();
    for &edge_id in &selection.edges {
        let Some((from, to)) = graph.endpoints(edge_id) else {
            continue;
        };
        let (tail, head) = match direction {
            Direction::Incoming => (to, from),
            _ => (from, to),
        };
        adjacency.entry(tail).or_default().push((edge_id, head));
    }

    let mut marks: HashMap<VertexId, Mark> = HashMap::new();
    let mut back = HashSet::new();
    let roots = std::iter::once(start).chain(selection.vertices.iter().copied());

    for root in roots {
        if marks.contains_key(&root) {
            continue;
        }
        marks.insert(root, Mark::OnStack);
        let mut stack: Vec<(VertexId, usize)> = vec![(root, 0)];

        while let Some(&(vertex, cursor)) = stack.last() {
            let successors = adjacency.get(&vertex).map(Vec::as_slice).unwrap_or(&[]);
            let Some(&(edge_id, head)) = successors.get(cursor) else {
                marks.insert(vertex, Mark::Done);
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            match marks.get(&head) {
                Some(Mark::OnStack) => {
                    back.insert(edge_id);
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(head, Mark::OnStack);
                    stack.push((head, 0));
                }
            }
        }
    }
    back
}
