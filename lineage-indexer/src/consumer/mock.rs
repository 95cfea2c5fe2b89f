use async_trait::async_trait;
use std::collections::VecDeque;

use super::EventSource;
use crate::errors::ConsumerError;
use lineage_shared::relationships::{
    PORT_ALIAS, PORT_IMPLEMENTATION, PROCESS, RELATIONAL_COLUMN, RELATIONAL_TABLE,
    TABULAR_COLUMN_TYPE,
};
use lineage_shared::{Edge, LineageEntity, ProcessLineageEvent};

/// In-memory event feed.
#[derive(Debug, Default)]
pub struct MockSource {
    entries: VecDeque<Result<ProcessLineageEvent, ConsumerError>>,
}

impl MockSource {
    pub fn new(events: Vec<ProcessLineageEvent>) -> Self {
        Self {
            entries: events.into_iter().map(Ok).collect(),
        }
    }

    pub fn push_event(&mut self, event: ProcessLineageEvent) {
        self.entries.push_back(Ok(event));
    }

    /// Queue an entry that fails to decode.
    pub fn push_malformed(&mut self, reason: impl Into<String>) {
        let position = self.entries.len() as u64 + 1;
        self.entries
            .push_back(Err(ConsumerError::malformed(position, reason)));
    }

    /// Queue a failure of the feed itself.
    pub fn push_error(&mut self, error: std::io::Error) {
        self.entries.push_back(Err(ConsumerError::Io(error)));
    }

    pub fn remaining(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl EventSource for MockSource {
    async fn next_event(&mut self) -> Result<Option<ProcessLineageEvent>, ConsumerError> {
        self.entries.pop_front().transpose()
    }
}

/// A small demonstration feed: one ETL process reading a column of an
/// `orders` table through two ports, plus the table's containment.
pub fn sample_events() -> Vec<ProcessLineageEvent> {
    let table = LineageEntity::new("orders", RELATIONAL_TABLE).with_property("displayName", "orders");
    let column = LineageEntity::new("orders.id", RELATIONAL_COLUMN)
        .with_property("displayName", "id")
        .with_property("containerGuid", "orders");

    let schema = ProcessLineageEvent::for_process(LineageEntity::new("load-orders", PROCESS))
        .with_element(table)
        .with_element(column)
        .with_relationship(Edge::new("orders", "orders.id", "AttributeForSchema"));

    let etl = ProcessLineageEvent::for_process(
        LineageEntity::new("etl-orders", PROCESS).with_property("displayName", "ETL orders"),
    )
    .with_element(LineageEntity::new("etl-orders.in", PORT_ALIAS))
    .with_anchored_element(
        LineageEntity::new("etl-orders.in.impl", PORT_IMPLEMENTATION),
        "etl-orders.in",
    )
    .with_anchored_element(
        LineageEntity::new("etl-orders.in.id", TABULAR_COLUMN_TYPE),
        "etl-orders.in.impl",
    )
    .with_relationship(Edge::new("orders.id", "etl-orders.in.id", "LineageMapping"));

    vec![schema, etl]
}
