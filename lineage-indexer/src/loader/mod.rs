//! Loader module for the lineage indexer.
//!
//! Merges processed events into the graph store, retrying transient store
//! failures with exponential backoff and dead-lettering events that still
//! cannot be merged.

mod dead_letter;

pub use dead_letter::{DeadLetter, DeadLetterQueue};

use std::sync::Arc;
use std::time::Duration;
use tokio_retry::{
    strategy::{jitter, ExponentialBackoff},
    RetryIf,
};
use tracing::{debug, instrument, warn};

use crate::errors::LoaderError;
use crate::processor::ProcessedEvent;
use lineage_graph::{GraphStore, MergeStats, StoreError};
use lineage_shared::ProcessLineageEvent;

/// Configuration for the graph loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Retries after the first failed merge attempt.
    pub max_retries: usize,
    /// Base of the exponential backoff, in milliseconds.
    pub retry_base_ms: u64,
    /// Upper bound for a single backoff delay.
    pub max_delay: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_base_ms: 10,
            max_delay: Duration::from_secs(5),
        }
    }
}

/// What happened to one event.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Merged(MergeStats),
    DeadLettered(DeadLetter),
}

/// Loader that merges staging subgraphs into the graph store.
pub struct GraphLoader {
    store: Arc<dyn GraphStore>,
    config: LoaderConfig,
    dead_letters: DeadLetterQueue,
}

impl GraphLoader {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self::with_config(store, LoaderConfig::default(), DeadLetterQueue::in_memory())
    }

    pub fn with_config(
        store: Arc<dyn GraphStore>,
        config: LoaderConfig,
        dead_letters: DeadLetterQueue,
    ) -> Self {
        Self {
            store,
            config,
            dead_letters,
        }
    }

    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    pub fn dead_letters(&self) -> &DeadLetterQueue {
        &self.dead_letters
    }

    /// Merge one processed event into its target graph.
    ///
    /// Transient store failures are retried; once retries run out, or on any
    /// other store failure, the event is dead-lettered. An error is returned
    /// only when the dead letter itself could not be persisted.
    #[instrument(skip(self, processed, event), fields(process = %processed.process_guid, graph = %processed.target))]
    pub async fn load(
        &mut self,
        sequence: u64,
        processed: ProcessedEvent,
        event: &ProcessLineageEvent,
    ) -> Result<LoadOutcome, LoaderError> {
        let strategy = ExponentialBackoff::from_millis(self.config.retry_base_ms)
            .factor(2)
            .max_delay(self.config.max_delay)
            .map(jitter)
            .take(self.config.max_retries);

        let store = Arc::clone(&self.store);
        let target = processed.target;
        let context = processed.context;
        let mut attempts = 0usize;

        let result = RetryIf::spawn(
            strategy,
            || {
                attempts += 1;
                std::future::ready(store.merge(target, &context))
            },
            |e: &StoreError| {
                let transient = e.is_transient();
                if transient {
                    warn!(error = %e, "Transient store failure, retrying merge");
                }
                transient
            },
        )
        .await;

        match result {
            Ok(stats) => {
                debug!(
                    attempts,
                    vertices_inserted = stats.vertices_inserted,
                    edges_inserted = stats.edges_inserted,
                    "Merged event"
                );
                Ok(LoadOutcome::Merged(stats))
            }
            Err(e) => {
                let letter = DeadLetter::new(sequence, target, event.clone(), e.to_string(), attempts);
                self.dead_letter(letter.clone()).await?;
                Ok(LoadOutcome::DeadLettered(letter))
            }
        }
    }

    /// Dead-letter an event without attempting a merge.
    pub async fn dead_letter(&mut self, letter: DeadLetter) -> Result<(), LoaderError> {
        self.dead_letters.push(letter).await
    }
}
