//! Editor and service configuration.

use crate::snap::SNAP_THRESHOLD;
use crate::viewport::{MAX_SCALE, MIN_SCALE, Viewport, ZOOM_STEP};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Address of the palette/export service when none is configured.
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000/";

/// Interaction and drawing constants. Lengths are screen pixels unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Vertex radius in world units.
    pub vertex_radius: f64,
    pub snap_threshold: f64,
    pub label_offset: f64,
    pub arrow_length: f64,
    pub double_click_ms: u64,
    /// Maximum pointer travel for a press/release to count as a click.
    pub click_slop: f64,
    pub zoom_step: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            vertex_radius: 20.0,
            snap_threshold: SNAP_THRESHOLD,
            label_offset: 10.0,
            arrow_length: 10.0,
            double_click_ms: 500,
            click_slop: 5.0,
            zoom_step: ZOOM_STEP,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
        }
    }
}

impl EditorConfig {
    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    /// A viewport honouring the configured scale range and zoom step.
    pub fn viewport(&self) -> Viewport {
        Viewport::with_limits(self.min_scale, self.max_scale, self.zoom_step)
    }
}

/// Location of the palette/export HTTP service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Resolve an endpoint below the base URL, keeping any path prefix.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)?.join(path.trim_start_matches('/'))
    }
}
