//! Configuration for the lineage indexer.
//!
//! Everything is read from environment variables (optionally loaded from a
//! `.env` file by the binary). Unset variables take their defaults; values
//! that do not parse are logged and also fall back to the default.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::loader::LoaderConfig;
use crate::orchestrator::OrchestratorConfig;
use lineage_graph::traversal::{DEFAULT_MAX_HOPS, DEFAULT_TIMEOUT};
use lineage_graph::{CyclePolicy, TraversalConfig};

/// Default directory for GraphML dumps.
const DEFAULT_DUMP_DIR: &str = "./lineage-dumps";

/// Default number of merge retries after a transient store failure.
const DEFAULT_MERGE_MAX_RETRIES: usize = 5;

/// Default backoff base in milliseconds.
const DEFAULT_MERGE_RETRY_BASE_MS: u64 = 10;

/// Default size of the consumer → orchestrator channel.
const DEFAULT_CHANNEL_BUFFER_SIZE: usize = 1000;

/// Resolved indexer configuration.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// JSON-lines event feed. The built-in sample feed is used when unset.
    pub events_path: Option<PathBuf>,
    pub dump_dir: PathBuf,
    pub dead_letter_path: Option<PathBuf>,
    pub traversal: TraversalConfig,
    pub loader: LoaderConfig,
    pub orchestrator: OrchestratorConfig,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            events_path: None,
            dump_dir: PathBuf::from(DEFAULT_DUMP_DIR),
            dead_letter_path: None,
            traversal: TraversalConfig::default(),
            loader: LoaderConfig::default(),
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

impl IndexerConfig {
    /// Read the configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `LINEAGE_EVENTS_PATH`: JSON-lines event feed (default: sample feed)
    /// - `LINEAGE_DUMP_DIR`: GraphML dump directory (default: ./lineage-dumps)
    /// - `LINEAGE_DEAD_LETTER_PATH`: dead-letter JSON-lines file (default: none)
    /// - `LINEAGE_MAX_HOPS`: traversal hop budget (default: 64)
    /// - `LINEAGE_TRAVERSAL_TIMEOUT_MS`: traversal time budget, 0 disables (default: 5000)
    /// - `LINEAGE_CYCLE_POLICY`: "include" or "omit-back-edges" (default: include)
    /// - `LINEAGE_MERGE_MAX_RETRIES`: merge retries (default: 5)
    /// - `LINEAGE_MERGE_RETRY_BASE_MS`: backoff base (default: 10)
    /// - `LINEAGE_CHANNEL_BUFFER_SIZE`: event channel size (default: 1000)
    pub fn from_env() -> Self {
        let timeout_ms = parse_env(
            "LINEAGE_TRAVERSAL_TIMEOUT_MS",
            DEFAULT_TIMEOUT.as_millis() as u64,
        );

        let traversal = TraversalConfig {
            max_hops: parse_env("LINEAGE_MAX_HOPS", DEFAULT_MAX_HOPS),
            timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
            cycle_policy: parse_env("LINEAGE_CYCLE_POLICY", CyclePolicy::default()),
            ..TraversalConfig::default()
        };

        let loader = LoaderConfig {
            max_retries: parse_env("LINEAGE_MERGE_MAX_RETRIES", DEFAULT_MERGE_MAX_RETRIES),
            retry_base_ms: parse_env("LINEAGE_MERGE_RETRY_BASE_MS", DEFAULT_MERGE_RETRY_BASE_MS),
            ..LoaderConfig::default()
        };

        let orchestrator = OrchestratorConfig {
            channel_buffer_size: parse_env(
                "LINEAGE_CHANNEL_BUFFER_SIZE",
                DEFAULT_CHANNEL_BUFFER_SIZE,
            )
            .max(1),
            ..OrchestratorConfig::default()
        };

        Self {
            events_path: path_env("LINEAGE_EVENTS_PATH"),
            dump_dir: path_env("LINEAGE_DUMP_DIR").unwrap_or_else(|| PathBuf::from(DEFAULT_DUMP_DIR)),
            dead_letter_path: path_env("LINEAGE_DEAD_LETTER_PATH"),
            traversal,
            loader,
            orchestrator,
        }
    }
}

fn path_env(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %value, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}
