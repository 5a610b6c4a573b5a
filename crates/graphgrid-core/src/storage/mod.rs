//! Where project documents are written to and read back from.
//!
//! A store holds a single serialized project, the same document the
//! export/import flow produces and accepts.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::project::ProjectError;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No project file at {}", .0.display())]
    NotFound(PathBuf),
    #[error("Nothing has been saved yet")]
    Empty,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error("Storage error: {0}")]
    Other(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Destination for saved projects and source for loaded ones.
pub trait ProjectStore: Send + Sync {
    /// Replace the stored document.
    fn write(&self, json: String) -> BoxFuture<'_, StorageResult<()>>;

    /// The stored document, unparsed.
    fn read(&self) -> BoxFuture<'_, StorageResult<String>>;
}
