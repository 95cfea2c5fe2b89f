//! Message types for the consumer.

use lineage_shared::ProcessLineageEvent;

/// Messages sent from the consumer task to the orchestrator.
#[derive(Debug)]
pub enum StreamMessage {
    /// A decoded event. `sequence` is its arrival position in the feed.
    Event {
        sequence: u64,
        event: ProcessLineageEvent,
    },
    /// A feed entry that could not be decoded.
    Malformed { sequence: u64, reason: String },
    /// The feed is exhausted.
    End,
    /// The feed failed and no more events will arrive.
    Error(String),
}
