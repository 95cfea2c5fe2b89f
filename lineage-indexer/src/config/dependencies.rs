//! Dependency initialization and wiring for the lineage indexer.

use std::sync::Arc;
use tracing::info;

use super::IndexerConfig;
use crate::consumer::{sample_events, EventSource, JsonLinesSource, MockSource};
use crate::loader::{DeadLetterQueue, GraphLoader};
use crate::orchestrator::Orchestrator;
use crate::processor::LineageProcessor;
use crate::service::LineageService;
use crate::IndexingError;
use lineage_graph::{GraphRegistry, TraversalEngine};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The graph store shared by ingestion and queries.
    pub registry: Arc<GraphRegistry>,
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    pub service: LineageService,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    pub async fn new() -> Result<Self, IndexingError> {
        Self::from_config(IndexerConfig::from_env()).await
    }

    /// Initialize all dependencies from an explicit configuration.
    pub async fn from_config(config: IndexerConfig) -> Result<Self, IndexingError> {
        info!(
            events_path = ?config.events_path,
            dump_dir = %config.dump_dir.display(),
            dead_letter_path = ?config.dead_letter_path,
            max_hops = config.traversal.max_hops,
            cycle_policy = %config.traversal.cycle_policy,
            "Initializing dependencies"
        );

        let source: Box<dyn EventSource> = match &config.events_path {
            Some(path) => Box::new(JsonLinesSource::open(path).await.map_err(|e| {
                IndexingError::config(format!(
                    "Failed to open event feed {}: {}",
                    path.display(),
                    e
                ))
            })?),
            None => {
                info!("LINEAGE_EVENTS_PATH not set, ingesting the sample feed");
                Box::new(MockSource::new(sample_events()))
            }
        };

        let registry = Arc::new(GraphRegistry::new());

        let dead_letters = match &config.dead_letter_path {
            Some(path) => DeadLetterQueue::with_file(path),
            None => DeadLetterQueue::in_memory(),
        };
        let loader = GraphLoader::with_config(registry.clone(), config.loader, dead_letters);

        let orchestrator = Orchestrator::with_config(
            source,
            LineageProcessor::new(),
            loader,
            config.orchestrator,
        );

        let service = LineageService::new(
            registry.clone(),
            TraversalEngine::new(config.traversal),
            config.dump_dir,
        );

        Ok(Self {
            registry,
            orchestrator,
            service,
        })
    }
}
