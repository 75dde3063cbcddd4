//! Pending-operation store implementations.
//!
//! The pending set is persisted as a whole: every change rewrites the full
//! collection. Loading never fails; unreadable state degrades to empty.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tedgo_core::{Operation, Result, TedGoError};
use tokio::sync::Mutex;

/// Ordered, non-deduplicated sequence of operations awaiting confirmation.
pub type PendingSet = Vec<Operation>;

/// Trait for pending-operation stores.
#[async_trait]
pub trait OperationStore: Send + Sync {
    /// Load the persisted set. Missing or corrupt state yields an empty set.
    async fn load_pending(&self) -> PendingSet;

    /// Append one operation and persist the whole set.
    async fn append_pending(&self, op: Operation) -> Result<()>;

    /// Overwrite the persisted set with `ops`.
    async fn replace_pending(&self, ops: PendingSet) -> Result<()>;
}

/// Store backed by a single JSON array file.
pub struct JsonFileStore {
    path: PathBuf,

    /// Serializes load-modify-persist cycles.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store for the file at `path`. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_set(&self) -> PendingSet {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "pending file unreadable, treating as empty"
                );
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<serde_json::Value>>(&bytes) {
            Ok(entries) => self.valid_entries(entries),
            Err(e) => {
                // TODO: move the corrupt file aside instead of dropping its contents on next write
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "pending file is corrupt, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Keep the entries that decode into a valid operation, in file order.
    fn valid_entries(&self, entries: Vec<serde_json::Value>) -> PendingSet {
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let checked = serde_json::from_value::<Operation>(entry)
                    .map_err(TedGoError::from)
                    .and_then(|op| op.validate().map(|()| op));
                match checked {
                    Ok(op) => Some(op),
                    Err(e) => {
                        tracing::warn!(
                            path = %self.path.display(),
                            index,
                            error = %e,
                            "dropping invalid pending entry"
                        );
                        None
                    }
                }
            })
            .collect()
    }

    /// Write to a sibling temp file, then rename over the target.
    async fn write_set(&self, ops: &[Operation]) -> Result<()> {
        let json = serde_json::to_vec_pretty(ops)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), count = ops.len(), "pending set persisted");
        Ok(())
    }
}

#[async_trait]
impl OperationStore for JsonFileStore {
    async fn load_pending(&self) -> PendingSet {
        self.read_set().await
    }

    async fn append_pending(&self, op: Operation) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut ops = self.read_set().await;
        ops.push(op);
        self.write_set(&ops).await
    }

    async fn replace_pending(&self, ops: PendingSet) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_set(&ops).await
    }
}

/// In-memory implementation of OperationStore.
#[derive(Clone, Default)]
pub struct InMemoryOperationStore {
    ops: Arc<Mutex<PendingSet>>,
}

impl InMemoryOperationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `ops`.
    pub fn with_pending(ops: PendingSet) -> Self {
        Self {
            ops: Arc::new(Mutex::new(ops)),
        }
    }
}

#[async_trait]
impl OperationStore for InMemoryOperationStore {
    async fn load_pending(&self) -> PendingSet {
        self.ops.lock().await.clone()
    }

    async fn append_pending(&self, op: Operation) -> Result<()> {
        self.ops.lock().await.push(op);
        Ok(())
    }

    async fn replace_pending(&self, ops: PendingSet) -> Result<()> {
        *self.ops.lock().await = ops;
        Ok(())
    }
}
