//! Errors raised while rendering, importing or dumping graphs.

use thiserror::Error;

/// Errors from the serializer.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to move dump into place: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// The document parsed but does not describe a valid graph.
    #[error("Invalid graph document: {0}")]
    InvalidGraph(String),
}

impl SerializeError {
    /// I/O failures may succeed on retry; malformed documents never will.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Persist(_))
    }
}
