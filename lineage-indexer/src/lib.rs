//! # Lineage Indexer
//!
//! Ingests process lineage events into the lineage graph store and serves
//! scoped lineage queries over it.
//!
//! ## Architecture
//!
//! The indexer follows the Consumer-Processor-Loader pattern:
//!
//! 1. **Consumer**: Reads decoded events from an ordered feed
//! 2. **Processor**: Validates an event and assembles its staging subgraph
//! 3. **Loader**: Merges the subgraph into MAIN or BUFFER, with retry and
//!    dead-lettering
//! 4. **Orchestrator**: Coordinates the ingest flow
//!
//! Queries, exports and dumps go through [`LineageService`].
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`consumer`]: Event sources
//! - [`processor`]: Turns events into staging subgraphs
//! - [`loader`]: Merges subgraphs into the graph store
//! - [`orchestrator`]: Coordinates the ingest flow
//! - [`service`]: Lineage query and export API
//! - [`errors`]: Error types for the indexer

pub mod config;
pub mod consumer;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod service;

pub use config::{Dependencies, IndexerConfig};
pub use errors::{IngestError, QueryError};
pub use orchestrator::IngestSummary;
pub use service::LineageService;

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),

    #[error("Query error: {0}")]
    QueryError(#[from] QueryError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
