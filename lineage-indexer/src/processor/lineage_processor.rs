//! Lineage event processor implementation.
//!
//! Validates a `ProcessLineageEvent` and assembles its `AssetContext`: the
//! process, every element, one edge per element whose type appears in the
//! relationship rule table, and the event's explicit relationships.

use tracing::{debug, instrument};

use crate::errors::ProcessorError;
use lineage_graph::{AssetContext, LineageGraph};
use lineage_shared::relationships::relationship_for;
use lineage_shared::{Edge, GraphName, LineageEntity, ProcessLineageEvent};

/// A validated event, ready to be merged.
#[derive(Debug, Clone)]
pub struct ProcessedEvent {
    /// MAIN, or BUFFER for partial events.
    pub target: GraphName,
    pub process_guid: String,
    pub context: AssetContext,
}

/// Builds staging subgraphs from lineage events.
///
/// The processor is stateless. References that are not part of the event
/// itself are resolved against a snapshot of the target graph.
#[derive(Debug, Clone, Default)]
pub struct LineageProcessor {}

impl LineageProcessor {
    pub fn new() -> Self {
        Self {}
    }

    /// The graph an event is merged into.
    pub fn target_graph(event: &ProcessLineageEvent) -> GraphName {
        if event.partial {
            GraphName::Buffer
        } else {
            GraphName::Main
        }
    }

    /// Process a single event against `existing`, the current state of its
    /// target graph.
    #[instrument(skip(self, event, existing), fields(process = event.process_guid()))]
    pub fn process(
        &self,
        event: &ProcessLineageEvent,
        existing: &LineageGraph,
    ) -> Result<ProcessedEvent, ProcessorError> {
        let process = event
            .process
            .as_ref()
            .ok_or_else(|| ProcessorError::malformed("event has no process"))?;
        validate_entity(process)?;

        let mut context = AssetContext::new();
        context.add_vertex(process.clone());

        for element in &event.elements {
            validate_entity(&element.entity)?;
            context.add_vertex(element.entity.clone());
        }

        // Anchors may name elements that appear later in the event
        for element in &event.elements {
            let anchor = element.anchor.as_deref().unwrap_or(&process.guid);
            ensure_known(anchor, &context, existing)
                .map_err(|guid| ProcessorError::malformed(format!("unknown anchor {guid}")))?;

            match relationship_for(&element.entity.type_name) {
                Some(label) => {
                    context.add_edge(Edge::new(anchor, element.entity.guid.clone(), label));
                }
                None => debug!(
                    guid = %element.entity.guid,
                    type_name = %element.entity.type_name,
                    "No relationship rule for element type"
                ),
            }
        }

        for edge in &event.relationships {
            if edge.label.is_empty() {
                return Err(ProcessorError::malformed(format!(
                    "relationship {} -> {} has no label",
                    edge.from, edge.to
                )));
            }
            for endpoint in [&edge.from, &edge.to] {
                ensure_known(endpoint, &context, existing).map_err(|guid| {
                    ProcessorError::malformed(format!(
                        "relationship {} references unknown vertex {guid}",
                        edge.id()
                    ))
                })?;
            }
            context.add_edge(edge.clone());
        }

        debug!(
            vertices = context.vertex_count(),
            edges = context.edge_count(),
            "Assembled event subgraph"
        );

        Ok(ProcessedEvent {
            target: Self::target_graph(event),
            process_guid: process.guid.clone(),
            context,
        })
    }
}

fn validate_entity(entity: &LineageEntity) -> Result<(), ProcessorError> {
    if entity.guid.trim().is_empty() {
        return Err(ProcessorError::malformed(format!(
            "{} entity has an empty guid",
            entity.type_name
        )));
    }
    if entity.type_name.trim().is_empty() {
        return Err(ProcessorError::malformed(format!(
            "entity {} has an empty type",
            entity.guid
        )));
    }
    Ok(())
}

fn ensure_known<'a>(
    guid: &'a str,
    context: &AssetContext,
    existing: &LineageGraph,
) -> Result<(), &'a str> {
    if context.contains_vertex(guid) || existing.contains_vertex(guid) {
        Ok(())
    } else {
        Err(guid)
    }
}
