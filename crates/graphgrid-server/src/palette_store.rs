//! Palette persistence: one JSON file, cached behind a lock.

use graphgrid_core::palette::{Palette, PaletteEntry, Rgb};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Palette file errors.
#[derive(Debug, Error)]
pub enum PaletteStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Colors written when no usable palette file exists.
pub fn default_palette() -> Palette {
    Palette::new(vec![
        PaletteEntry::new("Node Blue", Rgb::new(147, 197, 253)),
        PaletteEntry::new("Edge Gray", Rgb::new(74, 85, 104)),
        PaletteEntry::new("Error Red", Rgb::new(239, 68, 68)),
        PaletteEntry::new("Success Green", Rgb::new(34, 197, 94)),
    ])
}

/// The shared palette and the file backing it.
pub struct PaletteStore {
    path: PathBuf,
    palette: RwLock<Palette>,
}

impl PaletteStore {
    /// Load the palette at `path`.
    ///
    /// A missing, unreadable or empty file is replaced by the defaults.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, PaletteStoreError> {
        let path = path.into();
        let palette = match read_palette(&path).await {
            Ok(palette) if !palette.is_empty() => {
                info!("loaded {} palette colors from {}", palette.len(), path.display());
                palette
            }
            Ok(_) => {
                info!("palette file {} is empty, seeding defaults", path.display());
                seed(&path).await?
            }
            Err(e) => {
                warn!("could not read palette file {}: {e}, seeding defaults", path.display());
                seed(&path).await?
            }
        };
        Ok(Self {
            path,
            palette: RwLock::new(palette),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current palette.
    pub async fn get(&self) -> Palette {
        self.palette.read().await.clone()
    }

    /// Persist and publish a new palette.
    pub async fn save(&self, palette: Palette) -> Result<(), PaletteStoreError> {
        let mut current = self.palette.write().await;
        write_palette(&self.path, &palette).await?;
        info!("saved {} palette colors", palette.len());
        *current = palette;
        Ok(())
    }
}

async fn read_palette(path: &Path) -> Result<Palette, PaletteStoreError> {
    let json = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&json)?)
}

async fn write_palette(path: &Path, palette: &Palette) -> Result<(), PaletteStoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(palette)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

async fn seed(path: &Path) -> Result<Palette, PaletteStoreError> {
    let palette = default_palette();
    write_palette(path, &palette).await?;
    Ok(palette)
}
