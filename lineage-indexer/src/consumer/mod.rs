//! Consumer module for the lineage indexer.
//!
//! Reads decoded lineage events from an [`EventSource`] and forwards them,
//! in arrival order, to the orchestrator over a channel.

mod json_lines;
mod messages;
mod mock;

pub use json_lines::JsonLinesSource;
pub use messages::StreamMessage;
pub use mock::{sample_events, MockSource};

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use crate::errors::ConsumerError;
use lineage_shared::ProcessLineageEvent;

/// An ordered feed of lineage events.
#[async_trait]
pub trait EventSource: Send {
    /// The next event, or `Ok(None)` once the feed is exhausted.
    ///
    /// A recoverable error (see [`ConsumerError::is_recoverable`]) skips one
    /// entry; the next call continues after it.
    async fn next_event(&mut self) -> Result<Option<ProcessLineageEvent>, ConsumerError>;
}

/// Drain `source` into `sender` until the feed ends or shutdown is signalled.
pub async fn run_source(
    mut source: Box<dyn EventSource>,
    sender: mpsc::Sender<StreamMessage>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), ConsumerError> {
    let mut sequence: u64 = 0;

    loop {
        let next = tokio::select! {
            _ = shutdown.recv() => {
                info!("Consumer received shutdown signal");
                return Ok(());
            }
            next = source.next_event() => next,
        };
        sequence += 1;

        let message = match next {
            Ok(Some(event)) => StreamMessage::Event { sequence, event },
            Ok(None) => {
                debug!(events = sequence - 1, "Event feed exhausted");
                let _ = sender.send(StreamMessage::End).await;
                return Ok(());
            }
            Err(e) if e.is_recoverable() => {
                warn!(sequence, error = %e, "Skipping undecodable event");
                StreamMessage::Malformed {
                    sequence,
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                error!(error = %e, "Event feed failed");
                let _ = sender.send(StreamMessage::Error(e.to_string())).await;
                return Err(e);
            }
        };

        if sender.send(message).await.is_err() {
            debug!("Orchestrator dropped the event channel");
            return Ok(());
        }
    }
}
