//! Error types for the lineage indexer.

use lineage_graph::{SerializeError, StoreError, TraversalError};
use lineage_shared::ParseEnumError;
use thiserror::Error;

/// Errors raised while reading the event feed.
#[derive(Error, Debug)]
pub enum ConsumerError {
    /// The feed itself could not be read. Ends consumption.
    #[error("Event feed I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// One entry of the feed could not be decoded. Consumption continues.
    #[error("Undecodable event at position {position}: {reason}")]
    Malformed { position: u64, reason: String },
}

impl ConsumerError {
    pub fn malformed(position: u64, reason: impl Into<String>) -> Self {
        Self::Malformed {
            position,
            reason: reason.into(),
        }
    }

    /// Whether the consumer can move on to the next entry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// Errors raised while turning an event into a local subgraph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    /// Required identifying fields are missing or reference nothing.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),
}

impl ProcessorError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedEvent(msg.into())
    }
}

/// Errors raised by the graph loader.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The dead-letter record was kept in memory but not persisted.
    #[error("Failed to persist dead letter: {0}")]
    DeadLetterWrite(String),
}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        Self::DeadLetterWrite(err.to_string())
    }
}

impl From<serde_json::Error> for LoaderError {
    fn from(err: serde_json::Error) -> Self {
        Self::DeadLetterWrite(err.to_string())
    }
}

/// Errors returned by the lineage query and export API.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    InvalidArgument(#[from] ParseEnumError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Traversal error: {0}")]
    Traversal(#[from] TraversalError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),

    /// A background task running the request did not complete.
    #[error("Task error: {0}")]
    Task(String),
}

impl QueryError {
    /// Whether repeating the request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Serialize(e) => e.is_retryable(),
            Self::Store(e) => e.is_transient(),
            Self::Task(_) => true,
            _ => false,
        }
    }
}

/// Errors that end an ingestion run.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Consumer error: {0}")]
    ConsumerError(#[from] ConsumerError),

    #[error("Loader error: {0}")]
    LoaderError(#[from] LoaderError),

    /// Channel communication error.
    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl IngestError {
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::ChannelError(msg.into())
    }
}
