//! Project document on disk.

use super::{BoxFuture, ProjectStore, StorageError, StorageResult};
use crate::project::DEFAULT_PROJECT_FILE_NAME;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A project file at a fixed path.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `graph_project.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_PROJECT_FILE_NAME))
    }

    /// The project file under the platform data directory
    /// (`~/.local/share/graphgrid/` on Unix, `%LOCALAPPDATA%\graphgrid\` on Windows).
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Other("Could not determine home directory".into()))?;
        Ok(Self::in_dir(base.join("graphgrid")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProjectStore for FileStorage {
    fn write(&self, json: String) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, json)?;
            log::debug!("wrote project to {}", self.path.display());
            Ok(())
        })
    }

    fn read(&self) -> BoxFuture<'_, StorageResult<String>> {
        Box::pin(async move {
            fs::read_to_string(&self.path).map_err(|e| match e.kind() {
                ErrorKind::NotFound => StorageError::NotFound(self.path.clone()),
                _ => StorageError::Io(e),
            })
        })
    }
}
