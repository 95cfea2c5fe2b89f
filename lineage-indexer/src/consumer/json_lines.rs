use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::info;

use super::EventSource;
use crate::errors::ConsumerError;
use lineage_shared::ProcessLineageEvent;

/// Event feed with one JSON-encoded `ProcessLineageEvent` per line.
///
/// Blank lines are ignored. A line that does not decode, including one that
/// is not valid UTF-8, is reported as [`ConsumerError::Malformed`] carrying
/// its 1-based line number, and the next call continues with the following
/// line. Only failures of the underlying reader surface as I/O errors.
pub struct JsonLinesSource<R = File> {
    reader: BufReader<R>,
    buf: Vec<u8>,
    line: u64,
}

impl JsonLinesSource<File> {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ConsumerError> {
        let path = path.as_ref();
        let file = File::open(path).await?;
        info!(path = %path.display(), "Opened event feed");
        Ok(Self::from_reader(file))
    }
}

impl<R> JsonLinesSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            buf: Vec::new(),
            line: 0,
        }
    }
}

#[async_trait]
impl<R> EventSource for JsonLinesSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn next_event(&mut self) -> Result<Option<ProcessLineageEvent>, ConsumerError> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
                return Ok(None);
            }
            self.line += 1;
            if self.buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return serde_json::from_slice(&self.buf)
                .map(Some)
                .map_err(|e| ConsumerError::malformed(self.line, e.to_string()));
        }
    }
}
