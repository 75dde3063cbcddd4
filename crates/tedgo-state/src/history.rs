//! Append-only interaction log.
//!
//! Each event is one line: `[<RFC 3339 UTC>] <text>`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tedgo_core::Result;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Trait for interaction logs.
#[async_trait]
pub trait InteractionLog: Send + Sync {
    /// Append one timestamped event.
    async fn append(&self, line: &str) -> Result<()>;

    /// The last `n` lines, oldest first.
    async fn recent(&self, n: usize) -> Result<Vec<String>>;
}

/// Format one log line. Embedded newlines are folded so an event stays on one line.
pub fn format_entry(line: &str) -> String {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    let folded = line.trim_end().replace("\r\n", " | ").replace('\n', " | ");
    format!("[{timestamp}] {folded}")
}

fn tail(lines: &[String], n: usize) -> Vec<String> {
    lines[lines.len().saturating_sub(n)..].to_vec()
}

/// Interaction log backed by a text file opened in append mode.
pub struct FileInteractionLog {
    path: PathBuf,
}

impl FileInteractionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl InteractionLog for FileInteractionLog {
    async fn append(&self, line: &str) -> Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let mut entry = format_entry(line);
        entry.push('\n');
        file.write_all(entry.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn recent(&self, n: usize) -> Result<Vec<String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let lines: Vec<String> = content.lines().map(|l| l.trim().to_string()).collect();
        Ok(tail(&lines, n))
    }
}

/// In-memory implementation of InteractionLog.
#[derive(Clone, Default)]
pub struct MemoryInteractionLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryInteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line written so far.
    pub async fn lines(&self) -> Vec<String> {
        self.lines.lock().await.clone()
    }
}

#[async_trait]
impl InteractionLog for MemoryInteractionLog {
    async fn append(&self, line: &str) -> Result<()> {
        self.lines.lock().await.push(format_entry(line));
        Ok(())
    }

    async fn recent(&self, n: usize) -> Result<Vec<String>> {
        Ok(tail(&self.lines.lock().await, n))
    }
}
