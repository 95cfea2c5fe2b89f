//! Inbound lineage events.
//!
//! A `ProcessLineageEvent` describes one process and the port, schema and
//! term elements it touches. Events arrive already decoded, in order, from
//! the external event feed.

use serde::{Deserialize, Serialize};

use super::entity::{Edge, LineageEntity};

/// One element referenced by a process lineage event.
///
/// The element is connected to its `anchor` (or to the event's process when
/// no anchor is given) by the relationship type the rule table assigns to the
/// element's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageElement {
    pub entity: LineageEntity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

impl LineageElement {
    /// An element anchored on the event's process.
    pub fn new(entity: LineageEntity) -> Self {
        Self {
            entity,
            anchor: None,
        }
    }

    /// An element anchored on another vertex.
    pub fn anchored(entity: LineageEntity, anchor: impl Into<String>) -> Self {
        Self {
            entity,
            anchor: Some(anchor.into()),
        }
    }
}

/// A decoded process lineage event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessLineageEvent {
    /// The process this event describes. Required.
    #[serde(default)]
    pub process: Option<LineageEntity>,

    /// Elements mapped to edges through the rule table.
    #[serde(default)]
    pub elements: Vec<LineageElement>,

    /// Additional edges carried verbatim (semantic assignments, schema
    /// attributes, ...).
    #[serde(default)]
    pub relationships: Vec<Edge>,

    /// The event is one step of a multi-event assembly and belongs in the
    /// BUFFER graph until promoted.
    #[serde(default)]
    pub partial: bool,
}

impl ProcessLineageEvent {
    /// Create an event for a process with no elements.
    pub fn for_process(process: LineageEntity) -> Self {
        Self {
            process: Some(process),
            ..Self::default()
        }
    }

    /// Add an element anchored on the process.
    pub fn with_element(mut self, entity: LineageEntity) -> Self {
        self.elements.push(LineageElement::new(entity));
        self
    }

    /// Add an element anchored on another vertex.
    pub fn with_anchored_element(mut self, entity: LineageEntity, anchor: impl Into<String>) -> Self {
        self.elements.push(LineageElement::anchored(entity, anchor));
        self
    }

    /// Add an explicit relationship.
    pub fn with_relationship(mut self, edge: Edge) -> Self {
        self.relationships.push(edge);
        self
    }

    /// Mark the event as part of a partial assembly.
    pub fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    /// GUID of the process, if present.
    pub fn process_guid(&self) -> Option<&str> {
        self.process.as_ref().map(|p| p.guid.as_str())
    }
}
