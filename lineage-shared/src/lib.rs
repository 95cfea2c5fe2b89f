//! # Lineage Shared
//!
//! Data structures shared across the lineage graph store: the vertex and edge
//! model, the inbound `ProcessLineageEvent`, the relationship-type rule table
//! and the query enumerations (`GraphName`, `Scope`, `View`).

pub mod types;

pub use types::entity::{Edge, EdgeKey, LineageEntity, Properties};
pub use types::event::{LineageElement, ProcessLineageEvent};
pub use types::query::{GraphName, ParseEnumError, Scope, View};
pub use types::relationships;
pub use types::relationships::Granularity;
