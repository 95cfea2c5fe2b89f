//! Lineage Indexer Main Entry Point
//!
//! Ingests the configured event feed into MAIN, then freezes MAIN into
//! HISTORY and dumps it as GraphML.

use dotenv::dotenv;
use lineage_indexer::{Dependencies, IndexingError};
use lineage_graph::graph::memory;
use lineage_shared::GraphName;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), IndexingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lineage_indexer=info,lineage_graph=info"));

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "lineage-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "lineage-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting lineage indexer");

    let mut deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let summary = match deps.orchestrator.run().await {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Lineage indexer failed");
            return Err(e.into());
        }
    };

    let stats = deps.service.stats(GraphName::Main)?;
    let version = deps.service.snapshot(GraphName::Main)?;
    let path = deps.service.dump_graph(GraphName::Main).await?;

    info!(
        processed = summary.processed,
        merged = summary.merged,
        skipped = summary.skipped,
        dead_lettered = summary.dead_lettered,
        vertex_count = stats.vertex_count,
        edge_count = stats.edge_count,
        memory = %memory::format_bytes(stats.memory_bytes),
        history_version = version,
        dump = %path.display(),
        "Lineage indexer completed successfully"
    );
    Ok(())
}
