//! Errors raised by lineage traversals.

use std::time::Duration;
use thiserror::Error;

use crate::traversal::Subgraph;

/// Which traversal budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetKind {
    Hops(usize),
    Time(Duration),
}

impl std::fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetKind::Hops(hops) => write!(f, "more than {} hops", hops),
            BudgetKind::Time(limit) => write!(f, "more than {}ms", limit.as_millis()),
        }
    }
}

/// Errors from the traversal engine.
#[derive(Debug, Clone, Error)]
pub enum TraversalError {
    /// The starting vertex is not in the graph.
    #[error("Vertex not found: {0}")]
    NotFound(String),

    /// The traversal was aborted. `partial` holds what was collected so far.
    #[error("Traversal budget exceeded: {kind}")]
    BudgetExceeded {
        kind: BudgetKind,
        partial: Box<Subgraph>,
    },
}
