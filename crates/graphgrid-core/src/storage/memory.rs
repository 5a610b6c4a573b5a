//! Project document held in memory.

use super::{BoxFuture, ProjectStore, StorageError, StorageResult};
use std::sync::RwLock;

/// Keeps the last written document; for tests and hosts without a filesystem.
#[derive(Default)]
pub struct MemoryStorage {
    document: RwLock<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out holding `json`, as if it had been uploaded.
    pub fn with_document(json: impl Into<String>) -> Self {
        Self {
            document: RwLock::new(Some(json.into())),
        }
    }
}

fn poisoned(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {e}"))
}

impl ProjectStore for MemoryStorage {
    fn write(&self, json: String) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            *self.document.write().map_err(poisoned)? = Some(json);
            Ok(())
        })
    }

    fn read(&self) -> BoxFuture<'_, StorageResult<String>> {
        Box::pin(async move {
            self.document
                .read()
                .map_err(poisoned)?
                .clone()
                .ok_or(StorageError::Empty)
        })
    }
}
