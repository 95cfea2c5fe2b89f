//! Events that could not be merged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::error;
use uuid::Uuid;

use crate::errors::LoaderError;
use lineage_shared::{GraphName, ProcessLineageEvent};

/// One event the loader gave up on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadLetter {
    pub id: Uuid,
    /// Arrival position of the event in the feed.
    pub sequence: u64,
    pub process_guid: Option<String>,
    pub graph: GraphName,
    pub reason: String,
    /// Merge attempts made before giving up.
    pub attempts: usize,
    pub failed_at: DateTime<Utc>,
    pub event: ProcessLineageEvent,
}

impl DeadLetter {
    pub fn new(
        sequence: u64,
        graph: GraphName,
        event: ProcessLineageEvent,
        reason: impl Into<String>,
        attempts: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            process_guid: event.process_guid().map(str::to_owned),
            graph,
            reason: reason.into(),
            attempts,
            failed_at: Utc::now(),
            event,
        }
    }
}

/// Dead letters kept in memory and, when a path is configured, appended to
/// a JSON-lines file.
#[derive(Debug, Default)]
pub struct DeadLetterQueue {
    records: Vec<DeadLetter>,
    path: Option<PathBuf>,
}

impl DeadLetterQueue {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            records: Vec::new(),
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record a dead letter.
    ///
    /// The record is always kept in memory; an error means only the file
    /// append failed.
    pub async fn push(&mut self, letter: DeadLetter) -> Result<(), LoaderError> {
        error!(
            id = %letter.id,
            sequence = letter.sequence,
            process = letter.process_guid.as_deref().unwrap_or(""),
            graph = %letter.graph,
            attempts = letter.attempts,
            reason = %letter.reason,
            "Event dead-lettered"
        );

        let line = match &self.path {
            Some(_) => Some(serde_json::to_string(&letter)?),
            None => None,
        };
        self.records.push(letter);

        if let (Some(path), Some(mut line)) = (&self.path, line) {
            line.push('\n');
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            file.write_all(line.as_bytes()).await?;
            file.flush().await?;
        }
        Ok(())
    }

    pub fn records(&self) -> &[DeadLetter] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_shared::LineageEntity;

    fn letter(sequence: u64) -> DeadLetter {
        let event = ProcessLineageEvent::for_process(LineageEntity::new("p1", "Process"));
        DeadLetter::new(sequence, GraphName::Main, event, "store unavailable", 3)
    }

    #[tokio::test]
    async fn test_in_memory_queue() {
        let mut queue = DeadLetterQueue::in_memory();
        queue.push(letter(7)).await.unwrap();

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.records()[0].process_guid.as_deref(), Some("p1"));
        assert_eq!(queue.records()[0].sequence, 7);
    }

    #[tokio::test]
    async fn test_file_queue_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dead-letters.jsonl");
        let mut queue = DeadLetterQueue::with_file(&path);

        queue.push(letter(1)).await.unwrap();
        queue.push(letter(2)).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let decoded: Vec<DeadLetter> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1], queue.records()[1]);
    }

    #[tokio::test]
    async fn test_unwritable_file_keeps_record_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let mut queue = DeadLetterQueue::with_file(dir.path().join("missing").join("dl.jsonl"));

        let result = queue.push(letter(1)).await;

        assert!(matches!(result, Err(LoaderError::DeadLetterWrite(_))));
        assert_eq!(queue.len(), 1);
    }
}
