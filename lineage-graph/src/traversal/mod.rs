//! Scoped lineage traversal
//!
//! Computes the subgraph of a named graph related to one vertex:
//! - SOURCE_AND_DESTINATION: one hop up and down the data flow
//! - ULTIMATE_SOURCE / ULTIMATE_DESTINATION: BFS to the terminal ancestors
//!   or descendants
//! - END_TO_END: both of the above plus every path between a discovered
//!   terminal source and terminal destination
//! - GLOSSARY: glossary relationships only, in either direction
//!
//! Every walk keeps a visited set, so cycles terminate. Neighbours are
//! visited in adjacency insertion order and results are reported in graph
//! insertion order, which keeps output stable for an unchanged graph.

mod collapse;
mod cycles;

pub use collapse::ViewCollapser;

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::errors::{BudgetKind, TraversalError};
use crate::graph::{Direction, EdgeId, LineageGraph, VertexId};
use lineage_shared::relationships::{self, DATA_FLOW_RELATIONSHIPS};
use lineage_shared::{Edge, LineageEntity, ParseEnumError, Scope, View};

/// Default maximum BFS depth of a single walk.
pub const DEFAULT_MAX_HOPS: usize = 64;

/// Default wall-clock budget of one query.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How edges that close a directed cycle are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Report every edge the traversal visited.
    #[default]
    Include,
    /// Drop the back edges found by a depth-first walk from the start
    /// vertex, leaving an acyclic result.
    OmitBackEdges,
}

impl fmt::Display for CyclePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include => f.write_str("include"),
            Self::OmitBackEdges => f.write_str("omit-back-edges"),
        }
    }
}

impl FromStr for CyclePolicy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "include" => Ok(Self::Include),
            "omit-back-edges" => Ok(Self::OmitBackEdges),
            _ => Err(ParseEnumError {
                kind: "cycle policy",
                value: s.to_string(),
            }),
        }
    }
}

/// Limits and reporting options for lineage queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalConfig {
    /// Maximum depth any single walk may reach.
    pub max_hops: usize,
    /// Wall-clock budget of one query. `None` disables the check.
    pub timeout: Option<Duration>,
    pub cycle_policy: CyclePolicy,
    /// Relationship types treated as data flow.
    pub lineage_labels: Vec<String>,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            timeout: Some(DEFAULT_TIMEOUT),
            cycle_policy: CyclePolicy::default(),
            lineage_labels: DATA_FLOW_RELATIONSHIPS
                .iter()
                .map(|label| label.to_string())
                .collect(),
        }
    }
}

/// Result of a lineage query: a vertex list and an edge list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subgraph {
    pub vertices: Vec<LineageEntity>,
    pub edges: Vec<Edge>,
}

impl Subgraph {
    pub fn new(vertices: Vec<LineageEntity>, edges: Vec<Edge>) -> Self {
        Self { vertices, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_vertex(&self, guid: &str) -> bool {
        self.vertices.iter().any(|v| v.guid == guid)
    }

    pub fn contains_edge(&self, from: &str, to: &str, label: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.from == from && e.to == to && e.label == label)
    }

    /// GUIDs of the vertices, in result order.
    pub fn guids(&self) -> Vec<&str> {
        self.vertices.iter().map(|v| v.guid.as_str()).collect()
    }
}

/// Hop and time limits of one query.
struct Budget {
    max_hops: usize,
    timeout: Option<Duration>,
    started: Instant,
}

impl Budget {
    fn start(config: &TraversalConfig) -> Self {
        Self {
            max_hops: config.max_hops,
            timeout: config.timeout,
            started: Instant::now(),
        }
    }

    fn check_time(&self) -> Result<(), BudgetKind> {
        match self.timeout {
            Some(limit) if self.started.elapsed() >= limit => Err(BudgetKind::Time(limit)),
            _ => Ok(()),
        }
    }
}

/// Vertices and edges picked by a walk, by id, in discovery order.
#[derive(Debug, Default)]
struct Selection {
    vertices: Vec<VertexId>,
    edges: Vec<EdgeId>,
    seen_vertices: HashSet<VertexId>,
    seen_edges: HashSet<EdgeId>,
}

impl Selection {
    fn add_vertex(&mut self, id: VertexId) -> bool {
        let added = self.seen_vertices.insert(id);
        if added {
            self.vertices.push(id);
        }
        added
    }

    fn add_edge(&mut self, id: EdgeId) -> bool {
        let added = self.seen_edges.insert(id);
        if added {
            self.edges.push(id);
        }
        added
    }

    fn contains_vertex(&self, id: VertexId) -> bool {
        self.seen_vertices.contains(&id)
    }

    fn extend(&mut self, other: &Selection) {
        for &id in &other.vertices {
            self.add_vertex(id);
        }
        for &id in &other.edges {
            self.add_edge(id);
        }
    }

    fn remove_edges(&mut self, dropped: &HashSet<EdgeId>) {
        self.edges.retain(|id| !dropped.contains(id));
        self.seen_edges.retain(|id| !dropped.contains(id));
    }

    /// Clone the selected elements out of `graph`, in graph insertion order.
    fn materialize(&self, graph: &LineageGraph) -> Subgraph {
        let mut vertex_ids = self.vertices.clone();
        vertex_ids.sort_unstable();
        let mut edge_ids = self.edges.clone();
        edge_ids.sort_unstable();

        Subgraph {
            vertices: vertex_ids
                .into_iter()
                .filter_map(|id| graph.vertex(id).cloned())
                .collect(),
            edges: edge_ids
                .into_iter()
                .filter_map(|id| graph.edge(id).cloned())
                .collect(),
        }
    }
}

/// Breadth-first walk from `starts` over the edges accepted by `follow`.
///
/// Vertices at `depth_limit` are collected but not expanded. Discovering a
/// vertex deeper than the hop budget aborts the walk; whatever was
/// collected stays in `out`.
fn reach(
    graph: &LineageGraph,
    starts: &[VertexId],
    direction: Direction,
    follow: &dyn Fn(&Edge) -> bool,
    depth_limit: Option<usize>,
    budget: &Budget,
    out: &mut Selection,
) -> Result<(), BudgetKind> {
    let mut queue: VecDeque<(VertexId, usize)> = VecDeque::new();
    for &start in starts {
        if out.add_vertex(start) {
            queue.push_back((start, 0));
        }
    }

    while let Some((current, depth)) = queue.pop_front() {
        budget.check_time()?;
        if depth_limit.is_some_and(|limit| depth >= limit) {
            continue;
        }

        let (first, second): (&[EdgeId], &[EdgeId]) = match direction {
            Direction::Outgoing => (graph.outgoing(current), &[]),
            Direction::Incoming => (graph.incoming(current), &[]),
            Direction::Both => (graph.outgoing(current), graph.incoming(current)),
        };

        for &edge_id in first.iter().chain(second) {
            let (Some(edge), Some((from, to))) = (graph.edge(edge_id), graph.endpoints(edge_id))
            else {
                continue;
            };
            if !follow(edge) {
                continue;
            }

            let next = if from == current { to } else { from };
            if !out.contains_vertex(next) {
                if depth + 1 > budget.max_hops {
                    return Err(BudgetKind::Hops(budget.max_hops));
                }
                out.add_vertex(next);
                queue.push_back((next, depth + 1));
            }
            out.add_edge(edge_id);
        }
    }
    Ok(())
}

/// Runs lineage queries against a graph snapshot.
#[derive(Debug, Clone, Default)]
pub struct TraversalEngine {
    config: TraversalConfig,
}

impl TraversalEngine {
    pub fn new(config: TraversalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    fn is_lineage(&self, edge: &Edge) -> bool {
        self.config.lineage_labels.iter().any(|l| *l == edge.label)
    }

    fn has_lineage(&self, graph: &LineageGraph, id: VertexId, direction: Direction) -> bool {
        let ids = match direction {
            Direction::Incoming => graph.incoming(id),
            _ => graph.outgoing(id),
        };
        ids.iter()
            .filter_map(|&e| graph.edge(e))
            .any(|edge| self.is_lineage(edge))
    }

    /// Compute the `scope` subgraph around `guid`, reported at `view`.
    ///
    /// Returns an empty subgraph when `guid` has no qualifying edge, and
    /// `NotFound` when `guid` is not in the graph.
    pub fn lineage(
        &self,
        graph: &LineageGraph,
        scope: Scope,
        view: View,
        guid: &str,
    ) -> Result<Subgraph, TraversalError> {
        let start = graph
            .vertex_id(guid)
            .ok_or_else(|| TraversalError::NotFound(guid.to_string()))?;
        let budget = Budget::start(&self.config);
        let lineage = |edge: &Edge| self.is_lineage(edge);
        let glossary = |edge: &Edge| relationships::is_glossary(&edge.label);

        let mut selection = Selection::default();
        let walked = match scope {
            Scope::SourceAndDestination => reach(
                graph,
                &[start],
                Direction::Both,
                &lineage,
                Some(1),
                &budget,
                &mut selection,
            ),
            Scope::UltimateSource => reach(
                graph,
                &[start],
                Direction::Incoming,
                &lineage,
                None,
                &budget,
                &mut selection,
            ),
            Scope::UltimateDestination => reach(
                graph,
                &[start],
                Direction::Outgoing,
                &lineage,
                None,
                &budget,
                &mut selection,
            ),
            Scope::EndToEnd => self.end_to_end(graph, start, &budget, &mut selection),
            Scope::Glossary => reach(
                graph,
                &[start],
                Direction::Both,
                &glossary,
                None,
                &budget,
                &mut selection,
            ),
        };

        if let Err(kind) = walked {
            warn!(
                guid = %guid,
                scope = %scope,
                budget = %kind,
                vertices = selection.vertices.len(),
                "Lineage traversal aborted"
            );
            return Err(TraversalError::BudgetExceeded {
                kind,
                partial: Box::new(selection.materialize(graph)),
            });
        }

        if selection.edges.is_empty() {
            debug!(guid = %guid, scope = %scope, "No qualifying edges");
            return Ok(Subgraph::default());
        }

        if self.config.cycle_policy == CyclePolicy::OmitBackEdges {
            let orientation = match scope {
                Scope::UltimateSource => Direction::Incoming,
                _ => Direction::Outgoing,
            };
            let back_edges = cycles::back_edges(graph, &selection, start, orientation);
            if !back_edges.is_empty() {
                debug!(guid = %guid, dropped = back_edges.len(), "Omitting back edges");
                selection.remove_edges(&back_edges);
            }
        }

        let subgraph = selection.materialize(graph);
        let collapsed = ViewCollapser::new(view).collapse(graph, subgraph);
        debug!(
            guid = %guid,
            scope = %scope,
            view = %view,
            vertices = collapsed.vertex_count(),
            edges = collapsed.edge_count(),
            "Lineage traversal complete"
        );
        Ok(collapsed)
    }

    /// Both ultimate walks, then every lineage path from a terminal source
    /// they found to a terminal destination they found.
    fn end_to_end(
        &self,
        graph: &LineageGraph,
        start: VertexId,
        budget: &Budget,
        result: &mut Selection,
    ) -> Result<(), BudgetKind> {
        let lineage = |edge: &Edge| self.is_lineage(edge);

        let mut upstream = Selection::default();
        let up = reach(graph, &[start], Direction::Incoming, &lineage, None, budget, &mut upstream);
        result.extend(&upstream);
        up?;

        let mut downstream = Selection::default();
        let down = reach(graph, &[start], Direction::Outgoing, &lineage, None, budget, &mut downstream);
        result.extend(&downstream);
        down?;

        let sources: Vec<VertexId> = upstream
            .vertices
            .iter()
            .copied()
            .filter(|&v| !self.has_lineage(graph, v, Direction::Incoming))
            .collect();
        let destinations: Vec<VertexId> = downstream
            .vertices
            .iter()
            .copied()
            .filter(|&v| !self.has_lineage(graph, v, Direction::Outgoing))
            .collect();

        let mut to_destinations = Selection::default();
        reach(graph, &destinations, Direction::Incoming, &lineage, None, budget, &mut to_destinations)?;

        // The forward walk only enters vertices that reach a destination, so
        // every edge it collects lies on a source-to-destination path
        let on_path = |edge: &Edge| {
            self.is_lineage(edge)
                && graph
                    .vertex_id(&edge.to)
                    .is_some_and(|head| to_destinations.contains_vertex(head))
        };
        let mut from_sources = Selection::default();
        reach(graph, &sources, Direction::Outgoing, &on_path, None, budget, &mut from_sources)?;

        result.extend(&from_sources);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_shared::relationships::{
        ATTRIBUTE_FOR_SCHEMA, CONTAINER_GUID, GLOSSARY_TERM, LINEAGE_MAPPING, RELATIONAL_COLUMN,
        RELATIONAL_TABLE, SEMANTIC_ASSIGNMENT,
    };

    fn column(guid: &str) -> LineageEntity {
        LineageEntity::new(guid, RELATIONAL_COLUMN)
    }

    fn graph_with(guids: &[&str], edges: &[(&str, &str)]) -> LineageGraph {
        let mut graph = LineageGraph::new();
        for guid in guids {
            graph.add_vertex(column(guid));
        }
        for (from, to) in edges {
            graph
                .insert_edge(Edge::new(*from, *to, LINEAGE_MAPPING))
                .unwrap();
        }
        graph
    }

    fn engine() -> TraversalEngine {
        TraversalEngine::default()
    }

    fn sorted(subgraph: &Subgraph) -> Vec<&str> {
        let mut guids = subgraph.guids();
        guids.sort_unstable();
        guids
    }

    /// T1 with columns C1 (containment edge) and C2 (container property),
    /// and data flowing C1 -> C2. Without either link C2 would not belong
    /// to T1.
    fn table_scenario() -> LineageGraph {
        let mut graph = LineageGraph::new();
        graph.add_vertex(LineageEntity::new("T1", RELATIONAL_TABLE));
        graph.add_vertex(column("C1").with_property(CONTAINER_GUID, "T1"));
        graph.add_vertex(column("C2").with_property(CONTAINER_GUID, "T1"));
        graph
            .insert_edge(Edge::new("T1", "C1", ATTRIBUTE_FOR_SCHEMA))
            .unwrap();
        graph
            .insert_edge(Edge::new("C1", "C2", LINEAGE_MAPPING))
            .unwrap();
        graph
    }

    #[test]
    fn test_ultimate_source_column_view() {
        let graph = table_scenario();

        let result = engine()
            .lineage(&graph, Scope::UltimateSource, View::ColumnView, "C2")
            .unwrap();

        assert_eq!(sorted(&result), vec!["C1", "C2"]);
        assert_eq!(result.edge_count(), 1);
        assert!(result.contains_edge("C1", "C2", LINEAGE_MAPPING));
    }

    #[test]
    fn test_ultimate_source_table_view_collapses() {
        let graph = table_scenario();

        let result = engine()
            .lineage(&graph, Scope::UltimateSource, View::TableView, "C2")
            .unwrap();

        assert_eq!(result.guids(), vec!["T1"]);
        assert!(result.edges.is_empty());
    }

    #[test]
    fn test_table_view_keeps_column_without_container() {
        let mut graph = LineageGraph::new();
        graph.add_vertex(LineageEntity::new("T1", RELATIONAL_TABLE));
        graph.add_vertex(column("C1"));
        graph.add_vertex(column("C2"));
        graph
            .insert_edge(Edge::new("T1", "C1", ATTRIBUTE_FOR_SCHEMA))
            .unwrap();
        graph
            .insert_edge(Edge::new("C1", "C2", LINEAGE_MAPPING))
            .unwrap();

        let result = engine()
            .lineage(&graph, Scope::UltimateSource, View::TableView, "C2")
            .unwrap();

        assert_eq!(sorted(&result), vec!["C2", "T1"]);
        assert!(result.contains_edge("T1", "C2", LINEAGE_MAPPING));
    }

    #[test]
    fn test_unknown_guid_is_not_found() {
        let graph = table_scenario();

        let err = engine()
            .lineage(&graph, Scope::UltimateSource, View::ColumnView, "nope")
            .unwrap_err();

        assert!(matches!(err, TraversalError::NotFound(ref guid) if guid == "nope"));
    }

    #[test]
    fn test_no_qualifying_edges_is_empty() {
        let graph = table_scenario();

        let result = engine()
            .lineage(&graph, Scope::Glossary, View::ColumnView, "C1")
            .unwrap();
        assert!(result.is_empty());

        let result = engine()
            .lineage(&graph, Scope::UltimateSource, View::ColumnView, "C1")
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_source_and_destination_is_one_hop() {
        let graph = graph_with(
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("b", "c"), ("c", "d"), ("e", "c")],
        );

        let result = engine()
            .lineage(&graph, Scope::SourceAndDestination, View::ColumnView, "c")
            .unwrap();

        assert_eq!(result.guids(), vec!["b", "c", "d", "e"]);
        assert_eq!(result.edge_count(), 3);
        assert!(!result.contains_edge("a", "b", LINEAGE_MAPPING));
    }

    #[test]
    fn test_ultimate_source_reaches_terminal_ancestors() {
        // a -> b -> d, c -> d, d -> e
        let graph = graph_with(
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("b", "d"), ("c", "d"), ("d", "e")],
        );

        let result = engine()
            .lineage(&graph, Scope::UltimateSource, View::ColumnView, "d")
            .unwrap();

        assert_eq!(result.guids(), vec!["a", "b", "c", "d"]);
        assert_eq!(result.edge_count(), 3);

        let roots: Vec<_> = result
            .vertices
            .iter()
            .filter(|v| !result.edges.iter().any(|e| e.to == v.guid))
            .map(|v| v.guid.as_str())
            .collect();
        for root in roots {
            assert!(graph.neighbors(root, Direction::Incoming).is_empty());
        }
    }

    #[test]
    fn test_ultimate_destination() {
        let graph = graph_with(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("b", "d")],
        );

        let result = engine()
            .lineage(&graph, Scope::UltimateDestination, View::ColumnView, "b")
            .unwrap();

        assert_eq!(result.guids(), vec!["b", "c", "d"]);
        assert_eq!(result.edge_count(), 2);
    }

    #[test]
    fn test_end_to_end_includes_paths_between_terminals() {
        // s -> x -> v -> t, s -> y -> t, s -> z (z is not a discovered destination)
        let graph = graph_with(
            &["s", "x", "v", "t", "y", "z"],
            &[
                ("s", "x"),
                ("x", "v"),
                ("v", "t"),
                ("s", "y"),
                ("y", "t"),
                ("s", "z"),
            ],
        );

        let result = engine()
            .lineage(&graph, Scope::EndToEnd, View::ColumnView, "v")
            .unwrap();

        assert_eq!(result.guids(), vec!["s", "x", "v", "t", "y"]);
        assert!(result.contains_edge("s", "y", LINEAGE_MAPPING));
        assert!(result.contains_edge("y", "t", LINEAGE_MAPPING));
        assert!(!result.contains_vertex("z"));
        assert_eq!(result.edge_count(), 5);
    }

    #[test]
    fn test_end_to_end_ignores_branches_off_the_path() {
        // s -> a -> t, plus a long chain s -> x0 -> ... -> x9 that never meets t
        let chain: Vec<String> = (0..10).map(|i| format!("x{i}")).collect();
        let mut guids = vec!["s", "a", "t"];
        guids.extend(chain.iter().map(String::as_str));
        let mut edges = vec![("s", "a"), ("a", "t"), ("s", chain[0].as_str())];
        edges.extend(chain.windows(2).map(|w| (w[0].as_str(), w[1].as_str())));
        let graph = graph_with(&guids, &edges);

        let engine = TraversalEngine::new(TraversalConfig {
            max_hops: 4,
            ..TraversalConfig::default()
        });
        let result = engine
            .lineage(&graph, Scope::EndToEnd, View::ColumnView, "a")
            .unwrap();

        assert_eq!(sorted(&result), vec!["a", "s", "t"]);
        assert_eq!(result.edge_count(), 2);
        assert!(!result.contains_vertex("x0"));
    }

    #[test]
    fn test_glossary_follows_only_glossary_edges() {
        let mut graph = graph_with(&["c1", "c2"], &[("c1", "c2")]);
        graph.add_vertex(LineageEntity::new("term", GLOSSARY_TERM));
        graph
            .insert_edge(Edge::new("c1", "term", SEMANTIC_ASSIGNMENT))
            .unwrap();

        let from_column = engine()
            .lineage(&graph, Scope::Glossary, View::ColumnView, "c1")
            .unwrap();
        let from_term = engine()
            .lineage(&graph, Scope::Glossary, View::ColumnView, "term")
            .unwrap();

        assert_eq!(from_column.guids(), vec!["c1", "term"]);
        assert_eq!(from_term, from_column);
        assert!(!from_column.contains_vertex("c2"));
    }

    #[test]
    fn test_cycle_terminates_under_both_policies() {
        let graph = graph_with(&["a", "b"], &[("a", "b"), ("b", "a")]);

        let included = engine()
            .lineage(&graph, Scope::UltimateSource, View::ColumnView, "a")
            .unwrap();
        assert_eq!(included.guids(), vec!["a", "b"]);
        assert_eq!(included.edge_count(), 2);

        let omitting = TraversalEngine::new(TraversalConfig {
            cycle_policy: CyclePolicy::OmitBackEdges,
            ..TraversalConfig::default()
        });
        let acyclic = omitting
            .lineage(&graph, Scope::UltimateSource, View::ColumnView, "a")
            .unwrap();
        assert_eq!(acyclic.guids(), vec!["a", "b"]);
        assert_eq!(acyclic.edges, vec![Edge::new("b", "a", LINEAGE_MAPPING)]);
    }

    #[test]
    fn test_hop_budget_returns_partial() {
        let guids: Vec<String> = (0..10).map(|i| format!("v{i}")).collect();
        let refs: Vec<&str> = guids.iter().map(String::as_str).collect();
        let edges: Vec<(&str, &str)> = refs.windows(2).map(|w| (w[0], w[1])).collect();
        let graph = graph_with(&refs, &edges);

        let engine = TraversalEngine::new(TraversalConfig {
            max_hops: 3,
            ..TraversalConfig::default()
        });
        let err = engine
            .lineage(&graph, Scope::UltimateDestination, View::ColumnView, "v0")
            .unwrap_err();

        match err {
            TraversalError::BudgetExceeded { kind, partial } => {
                assert_eq!(kind, BudgetKind::Hops(3));
                assert_eq!(partial.guids(), vec!["v0", "v1", "v2", "v3"]);
            }
            other => panic!("unexpected error: {other}"),
        }

        // A walk exactly max_hops deep fits the budget
        let fits = engine
            .lineage(&graph, Scope::UltimateSource, View::ColumnView, "v3")
            .unwrap();
        assert_eq!(fits.vertex_count(), 4);
    }

    #[test]
    fn test_zero_timeout_aborts() {
        let graph = graph_with(&["a", "b"], &[("a", "b")]);
        let engine = TraversalEngine::new(TraversalConfig {
            timeout: Some(Duration::ZERO),
            ..TraversalConfig::default()
        });

        let err = engine.lineage(&graph, Scope::UltimateDestination, View::ColumnView, "a");

        assert!(matches!(
            err,
            Err(TraversalError::BudgetExceeded {
                kind: BudgetKind::Time(_),
                ..
            })
        ));
    }

    #[test]
    fn test_output_is_deterministic() {
        let graph = graph_with(
            &["a", "b", "c", "d"],
            &[("a", "c"), ("b", "c"), ("c", "d")],
        );

        let first = engine()
            .lineage(&graph, Scope::EndToEnd, View::ColumnView, "c")
            .unwrap();
        let second = engine()
            .lineage(&graph, Scope::EndToEnd, View::ColumnView, "c")
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_cycle_policy_parsing() {
        assert_eq!("include".parse::<CyclePolicy>().unwrap(), CyclePolicy::Include);
        assert_eq!(
            "OMIT_BACK_EDGES".parse::<CyclePolicy>().unwrap(),
            CyclePolicy::OmitBackEdges
        );
        assert!("sometimes".parse::<CyclePolicy>().is_err());
        assert_eq!(CyclePolicy::OmitBackEdges.to_string(), "omit-back-edges");
    }
}
