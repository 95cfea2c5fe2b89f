//! Integration tests for the lineage ingestion pipeline.
//!
//! These tests use the real Orchestrator with in-memory event sources and a
//! graph store that can be made to fail on demand.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use lineage_graph::{
    AssetContext, Direction, GraphRegistry, GraphStore, LineageGraph, MergeStats, StoreError,
    UpsertOutcome,
};
use lineage_indexer::consumer::{JsonLinesSource, MockSource};
use lineage_indexer::errors::{ConsumerError, IngestError};
use lineage_indexer::loader::{DeadLetter, DeadLetterQueue, GraphLoader, LoaderConfig};
use lineage_indexer::orchestrator::{Orchestrator, OrchestratorConfig};
use lineage_indexer::processor::LineageProcessor;
use lineage_shared::relationships::{
    LINEAGE_MAPPING, PORT_ALIAS, PORT_DELEGATION, PORT_IMPLEMENTATION, PORT_SCHEMA, PROCESS,
    TABULAR_COLUMN_TYPE,
};
use lineage_shared::{Edge, EdgeKey, GraphName, LineageEntity, ProcessLineageEvent};

const TEST_TIMEOUT: Duration = Duration::from_secs(10);

// Store whose merges fail with `Unavailable` a fixed number of times
struct FlakyStore {
    inner: GraphRegistry,
    failures_left: AtomicUsize,
    merge_calls: AtomicUsize,
}

impl FlakyStore {
    fn failing(times: usize) -> Self {
        Self {
            inner: GraphRegistry::new(),
            failures_left: AtomicUsize::new(times),
            merge_calls: AtomicUsize::new(0),
        }
    }

    fn merge_calls(&self) -> usize {
        self.merge_calls.load(Ordering::SeqCst)
    }
}

impl GraphStore for FlakyStore {
    fn merge(&self, graph: GraphName, context: &AssetContext) -> Result<MergeStats, StoreError> {
        self.merge_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StoreError::unavailable("injected failure"));
        }
        self.inner.merge(graph, context)
    }

    fn upsert_vertex(
        &self,
        graph: GraphName,
        entity: LineageEntity,
    ) -> Result<UpsertOutcome, StoreError> {
        self.inner.upsert_vertex(graph, entity)
    }

    fn upsert_edge(&self, graph: GraphName, edge: Edge) -> Result<bool, StoreError> {
        self.inner.upsert_edge(graph, edge)
    }

    fn get_vertex(&self, graph: GraphName, guid: &str) -> Result<Option<LineageEntity>, StoreError> {
        self.inner.get_vertex(graph, guid)
    }

    fn neighbors(
        &self,
        graph: GraphName,
        guid: &str,
        direction: Direction,
    ) -> Result<Vec<Edge>, StoreError> {
        self.inner.neighbors(graph, guid, direction)
    }

    fn remove_vertex(&self, graph: GraphName, guid: &str) -> Result<Vec<Edge>, StoreError> {
        self.inner.remove_vertex(graph, guid)
    }

    fn snapshot(&self, graph: GraphName) -> Result<u64, StoreError> {
        self.inner.snapshot(graph)
    }

    fn read(&self, graph: GraphName) -> Result<Arc<LineageGraph>, StoreError> {
        self.inner.read(graph)
    }
}

fn fast_loader_config(max_retries: usize) -> LoaderConfig {
    LoaderConfig {
        max_retries,
        retry_base_ms: 1,
        max_delay: Duration::from_millis(5),
    }
}

fn test_config() -> OrchestratorConfig {
    OrchestratorConfig {
        channel_buffer_size: 4,
        progress_interval: Duration::from_secs(60),
    }
}

fn port_event(process: &str) -> ProcessLineageEvent {
    let alias = format!("{process}.alias");
    let implementation = format!("{process}.impl");
    ProcessLineageEvent::for_process(LineageEntity::new(process, PROCESS))
        .with_element(LineageEntity::new(alias.clone(), PORT_ALIAS))
        .with_anchored_element(LineageEntity::new(implementation.clone(), PORT_IMPLEMENTATION), alias)
        .with_anchored_element(
            LineageEntity::new(format!("{process}.column"), TABULAR_COLUMN_TYPE),
            implementation,
        )
}

fn orchestrator(
    source: MockSource,
    store: Arc<dyn GraphStore>,
    loader_config: LoaderConfig,
    dead_letters: DeadLetterQueue,
) -> Orchestrator {
    Orchestrator::with_config(
        Box::new(source),
        LineageProcessor::new(),
        GraphLoader::with_config(store, loader_config, dead_letters),
        test_config(),
    )
}

fn edge_key(from: &str, to: &str, label: &str) -> EdgeKey {
    Edge::new(from, to, label).key()
}

#[tokio::test]
async fn test_port_event_builds_expected_subgraph() {
    let registry = Arc::new(GraphRegistry::new());
    let mut orchestrator = orchestrator(
        MockSource::new(vec![port_event("P")]),
        registry.clone(),
        fast_loader_config(2),
        DeadLetterQueue::in_memory(),
    );

    let summary = timeout(TEST_TIMEOUT, orchestrator.run())
        .await
        .expect("orchestrator timed out")
        .unwrap();

    assert_eq!(summary.merged, 1);
    let main = registry.read(GraphName::Main).unwrap();
    assert_eq!(main.vertex_count(), 4);
    assert_eq!(main.edge_count(), 3);
    assert!(main.contains_edge(&edge_key("P", "P.alias", PORT_DELEGATION)));
    assert!(main.contains_edge(&edge_key("P.alias", "P.impl", PORT_SCHEMA)));
    assert!(main.contains_edge(&edge_key("P.impl", "P.column", LINEAGE_MAPPING)));
}

#[tokio::test]
async fn test_replayed_feed_is_idempotent() {
    let registry = Arc::new(GraphRegistry::new());
    let events = vec![port_event("P"), port_event("P"), port_event("Q")];
    let mut orchestrator = orchestrator(
        MockSource::new(events),
        registry.clone(),
        fast_loader_config(2),
        DeadLetterQueue::in_memory(),
    );

    let summary = timeout(TEST_TIMEOUT, orchestrator.run())
        .await
        .expect("orchestrator timed out")
        .unwrap();

    assert_eq!(summary.merged, 3);
    let stats = registry.stats(GraphName::Main).unwrap();
    assert_eq!(stats.vertex_count, 8);
    assert_eq!(stats.edge_count, 6);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let store = Arc::new(FlakyStore::failing(2));
    let mut orchestrator = orchestrator(
        MockSource::new(vec![port_event("P")]),
        store.clone(),
        fast_loader_config(3),
        DeadLetterQueue::in_memory(),
    );

    let summary = timeout(TEST_TIMEOUT, orchestrator.run())
        .await
        .expect("orchestrator timed out")
        .unwrap();

    assert_eq!(summary.merged, 1);
    assert_eq!(summary.dead_lettered, 0);
    assert_eq!(store.merge_calls(), 3);
    assert_eq!(store.read(GraphName::Main).unwrap().vertex_count(), 4);
}

#[tokio::test]
async fn test_exhausted_retries_dead_letter_the_event() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dead-letters.jsonl");
    let store = Arc::new(FlakyStore::failing(usize::MAX));
    let mut orchestrator = orchestrator(
        MockSource::new(vec![port_event("P"), port_event("Q")]),
        store.clone(),
        fast_loader_config(2),
        DeadLetterQueue::with_file(&path),
    );

    let summary = timeout(TEST_TIMEOUT, orchestrator.run())
        .await
        .expect("orchestrator timed out")
        .unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.merged, 0);
    assert_eq!(summary.dead_lettered, 2);
    // One attempt plus two retries per event
    assert_eq!(store.merge_calls(), 6);
    assert!(store.read(GraphName::Main).unwrap().is_empty());

    let records = orchestrator.loader().dead_letters().records();
    assert_eq!(records[0].attempts, 3);
    assert_eq!(records[0].process_guid.as_deref(), Some("P"));
    assert_eq!(records[1].sequence, 2);

    let persisted: Vec<DeadLetter> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(persisted, records);
}

#[tokio::test]
async fn test_malformed_events_are_skipped() {
    let registry = Arc::new(GraphRegistry::new());
    let mut source = MockSource::new(vec![
        ProcessLineageEvent::default(),
        ProcessLineageEvent::for_process(LineageEntity::new("P", PROCESS))
            .with_anchored_element(LineageEntity::new("I", PORT_IMPLEMENTATION), "unknown"),
    ]);
    source.push_malformed("truncated line");
    source.push_event(port_event("Q"));
    let mut orchestrator = orchestrator(
        source,
        registry.clone(),
        fast_loader_config(2),
        DeadLetterQueue::in_memory(),
    );

    let summary = timeout(TEST_TIMEOUT, orchestrator.run())
        .await
        .expect("orchestrator timed out")
        .unwrap();

    assert_eq!(summary.processed, 4);
    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.merged, 1);
    let main = registry.read(GraphName::Main).unwrap();
    assert!(!main.contains_vertex("P"));
    assert!(main.contains_vertex("Q"));
}

#[tokio::test]
async fn test_partial_events_wait_in_buffer() {
    let registry = Arc::new(GraphRegistry::new());
    let first = ProcessLineageEvent::for_process(LineageEntity::new("P", PROCESS))
        .with_element(LineageEntity::new("P.alias", PORT_ALIAS))
        .partial();
    // Anchors on a vertex that only exists in BUFFER so far
    let second = ProcessLineageEvent::for_process(LineageEntity::new("P", PROCESS))
        .with_anchored_element(LineageEntity::new("P.impl", PORT_IMPLEMENTATION), "P.alias")
        .partial();
    let mut orchestrator = orchestrator(
        MockSource::new(vec![first, second]),
        registry.clone(),
        fast_loader_config(2),
        DeadLetterQueue::in_memory(),
    );

    let summary = timeout(TEST_TIMEOUT, orchestrator.run())
        .await
        .expect("orchestrator timed out")
        .unwrap();

    assert_eq!(summary.merged, 2);
    assert!(registry.read(GraphName::Main).unwrap().is_empty());
    assert_eq!(registry.stats(GraphName::Buffer).unwrap().edge_count, 2);

    registry.promote_buffer().unwrap();

    assert_eq!(registry.stats(GraphName::Main).unwrap().vertex_count, 3);
    assert!(registry.read(GraphName::Buffer).unwrap().is_empty());
}

#[tokio::test]
async fn test_feed_failure_ends_the_run() {
    let registry = Arc::new(GraphRegistry::new());
    let mut source = MockSource::new(vec![port_event("P")]);
    source.push_error(io::Error::new(io::ErrorKind::UnexpectedEof, "feed closed"));
    let mut orchestrator = orchestrator(
        source,
        registry.clone(),
        fast_loader_config(2),
        DeadLetterQueue::in_memory(),
    );

    let result = timeout(TEST_TIMEOUT, orchestrator.run())
        .await
        .expect("orchestrator timed out");

    assert!(matches!(
        result,
        Err(IngestError::ConsumerError(ConsumerError::Io(_)))
    ));
    // Events before the failure are kept
    assert_eq!(registry.stats(GraphName::Main).unwrap().vertex_count, 4);
    assert_eq!(orchestrator.summary().merged, 1);
}

#[tokio::test]
async fn test_json_lines_feed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let lines: Vec<String> = vec![
        serde_json::to_string(&port_event("P")).unwrap(),
        "{ not json".to_string(),
        serde_json::to_string(&port_event("Q")).unwrap(),
    ];
    std::fs::write(&path, lines.join("\n")).unwrap();

    let registry = Arc::new(GraphRegistry::new());
    let mut orchestrator = Orchestrator::with_config(
        Box::new(JsonLinesSource::open(&path).await.unwrap()),
        LineageProcessor::new(),
        GraphLoader::new(registry.clone()),
        test_config(),
    );

    let summary = timeout(TEST_TIMEOUT, orchestrator.run())
        .await
        .expect("orchestrator timed out")
        .unwrap();

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.merged, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(registry.stats(GraphName::Main).unwrap().vertex_count, 8);
}

#[tokio::test]
async fn test_invalid_utf8_line_does_not_stop_the_feed() {
    let mut feed = serde_json::to_vec(&port_event("P")).unwrap();
    feed.extend_from_slice(b"\n\xff\xfe garbage\n");
    feed.extend_from_slice(&serde_json::to_vec(&port_event("Q")).unwrap());
    feed.push(b'\n');

    let registry = Arc::new(GraphRegistry::new());
    let mut orchestrator = Orchestrator::with_config(
        Box::new(JsonLinesSource::from_reader(io::Cursor::new(feed))),
        LineageProcessor::new(),
        GraphLoader::new(registry.clone()),
        test_config(),
    );

    let summary = timeout(TEST_TIMEOUT, orchestrator.run())
        .await
        .expect("orchestrator timed out")
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.merged, 2);
    assert!(registry.get_vertex(GraphName::Main, "Q.column").unwrap().is_some());
}
