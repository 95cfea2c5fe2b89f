//! Orchestrator module for the lineage indexer.
//!
//! Coordinates the consumer, processor, and loader components.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, instrument, warn};

use crate::consumer::{run_source, EventSource, StreamMessage};
use crate::errors::IngestError;
use crate::loader::{DeadLetter, GraphLoader, LoadOutcome};
use crate::processor::LineageProcessor;
use lineage_shared::ProcessLineageEvent;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Size of the message channel buffer.
    pub channel_buffer_size: usize,
    /// How often ingestion progress is logged.
    pub progress_interval: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: 1000,
            progress_interval: Duration::from_secs(10),
        }
    }
}

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Events received from the feed, including undecodable ones.
    pub processed: u64,
    pub merged: u64,
    /// Undecodable or malformed events.
    pub skipped: u64,
    pub dead_lettered: u64,
}

#[derive(Debug, Default)]
struct Counters {
    processed: AtomicU64,
    merged: AtomicU64,
    skipped: AtomicU64,
    dead_lettered: AtomicU64,
}

impl Counters {
    fn summary(&self) -> IngestSummary {
        IngestSummary {
            processed: self.processed.load(Ordering::Relaxed),
            merged: self.merged.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            dead_lettered: self.dead_lettered.load(Ordering::Relaxed),
        }
    }
}

/// Orchestrator that runs the single ingestion path.
///
/// Events are taken from the feed in arrival order and each one is
/// processed and merged before the next is looked at.
pub struct Orchestrator {
    source: Option<Box<dyn EventSource>>,
    processor: LineageProcessor,
    loader: GraphLoader,
    config: OrchestratorConfig,
    shutdown_tx: broadcast::Sender<()>,
    counters: Arc<Counters>,
}

impl Orchestrator {
    pub fn new(source: Box<dyn EventSource>, processor: LineageProcessor, loader: GraphLoader) -> Self {
        Self::with_config(source, processor, loader, OrchestratorConfig::default())
    }

    pub fn with_config(
        source: Box<dyn EventSource>,
        processor: LineageProcessor,
        loader: GraphLoader,
        config: OrchestratorConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            source: Some(source),
            processor,
            loader,
            config,
            shutdown_tx,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn loader(&self) -> &GraphLoader {
        &self.loader
    }

    /// Counters so far.
    pub fn summary(&self) -> IngestSummary {
        self.counters.summary()
    }

    /// Run until the feed ends or a shutdown signal arrives.
    ///
    /// Malformed events are skipped and merge failures dead-lettered; only a
    /// failure of the feed itself ends the run with an error.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<IngestSummary, IngestError> {
        info!("Starting lineage indexer orchestrator");

        let source = self
            .source
            .take()
            .ok_or_else(|| IngestError::channel("event source already consumed"))?;

        let (event_transmitter, mut event_receiver) =
            mpsc::channel::<StreamMessage>(self.config.channel_buffer_size);

        let shutdown_rx = self.shutdown_tx.subscribe();
        let consumer_handle =
            tokio::spawn(async move { run_source(source, event_transmitter, shutdown_rx).await });

        let mut progress_timer = interval(self.config.progress_interval);
        progress_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut prev_processed: u64 = 0;
        let mut prev_time = std::time::Instant::now();

        loop {
            tokio::select! {
                msg = event_receiver.recv() => {
                    match msg {
                        Some(StreamMessage::Event { sequence, event }) => {
                            self.handle_event(sequence, event).await;
                        }
                        Some(StreamMessage::Malformed { sequence, reason }) => {
                            self.counters.processed.fetch_add(1, Ordering::Relaxed);
                            self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                            warn!(sequence, reason = %reason, "Skipping undecodable event");
                        }
                        Some(StreamMessage::Error(e)) => {
                            error!(error = %e, "Received error from consumer");
                            break;
                        }
                        Some(StreamMessage::End) | None => {
                            info!("Event feed ended");
                            break;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    let _ = self.shutdown_tx.send(());
                    break;
                }
                _ = progress_timer.tick() => {
                    let processed = self.counters.processed.load(Ordering::Relaxed);
                    let now = std::time::Instant::now();
                    let elapsed_secs = now.duration_since(prev_time).as_secs_f64();
                    let events_per_sec = if elapsed_secs > 0.0 {
                        (processed.saturating_sub(prev_processed) as f64) / elapsed_secs
                    } else {
                        0.0
                    };

                    info!(
                        events_processed = processed,
                        events_merged = self.counters.merged.load(Ordering::Relaxed),
                        events_per_sec = format!("{:.2}", events_per_sec),
                        "Processing progress"
                    );

                    prev_processed = processed;
                    prev_time = now;
                }
            }
        }

        // Stop the consumer if we left the loop before it finished
        let _ = self.shutdown_tx.send(());
        drop(event_receiver);
        match consumer_handle.await {
            Ok(Err(e)) => return Err(e.into()),
            Err(e) => return Err(IngestError::channel(format!("consumer task failed: {e}"))),
            Ok(Ok(())) => {}
        }

        let summary = self.counters.summary();
        info!(
            processed = summary.processed,
            merged = summary.merged,
            skipped = summary.skipped,
            dead_lettered = summary.dead_lettered,
            "Orchestrator shutdown complete"
        );
        Ok(summary)
    }

    async fn handle_event(&mut self, sequence: u64, event: ProcessLineageEvent) {
        self.counters.processed.fetch_add(1, Ordering::Relaxed);

        let target = LineageProcessor::target_graph(&event);
        let existing = match self.loader.store().read(target) {
            Ok(graph) => graph,
            Err(e) => {
                error!(sequence, error = %e, "Failed to read target graph");
                self.dead_letter(sequence, event, e.to_string()).await;
                return;
            }
        };

        let processed = match self.processor.process(&event, &existing) {
            Ok(processed) => processed,
            Err(e) => {
                warn!(sequence, process = event.process_guid().unwrap_or(""), error = %e, "Skipping malformed event");
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };
        // Release the snapshot so the merge does not copy the graph
        drop(existing);

        match self.loader.load(sequence, processed, &event).await {
            Ok(LoadOutcome::Merged(_)) => {
                self.counters.merged.fetch_add(1, Ordering::Relaxed);
            }
            Ok(LoadOutcome::DeadLettered(_)) => {
                self.counters.dead_lettered.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                error!(sequence, error = %e, "Dead letter kept in memory only");
                self.counters.dead_lettered.fetch_add(1, Ordering::Relaxed);
            }
        }
        debug!(sequence, "Event handled");
    }

    async fn dead_letter(&mut self, sequence: u64, event: ProcessLineageEvent, reason: String) {
        let target = LineageProcessor::target_graph(&event);
        let letter = DeadLetter::new(sequence, target, event, reason, 0);
        if let Err(e) = self.loader.dead_letter(letter).await {
            error!(sequence, error = %e, "Dead letter kept in memory only");
        }
        self.counters.dead_lettered.fetch_add(1, Ordering::Relaxed);
    }

    /// Trigger a graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}
