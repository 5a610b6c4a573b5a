//! Renderer trait abstraction.

use graphgrid_core::Editor;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Invalid surface size {0:?}")]
    InvalidSize(Size),
}

impl From<std::fmt::Error> for RendererError {
    fn from(e: std::fmt::Error) -> Self {
        RendererError::RenderFailed(e.to_string())
    }
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Colors used for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub edge: Color,
    pub edge_preview: Color,
    pub edge_label: Color,
    pub vertex_fill: Color,
    pub vertex_stroke: Color,
    /// Outline of the element an edge is being drawn from.
    pub edge_start_stroke: Color,
    pub text: Color,
    pub guide: Color,
    pub guide_active: Color,
    pub midpoint_segment: Color,
    pub midpoint_dot: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            edge: Color::from_rgba8(74, 85, 104, 255),
            edge_preview: Color::from_rgba8(248, 113, 113, 255),
            edge_label: Color::from_rgba8(30, 64, 175, 255),
            vertex_fill: Color::from_rgba8(147, 197, 253, 255),
            vertex_stroke: Color::from_rgba8(31, 41, 55, 255),
            edge_start_stroke: Color::from_rgba8(59, 130, 246, 255),
            text: Color::from_rgba8(17, 24, 39, 255),
            guide: Color::from_rgba8(165, 180, 252, 255),
            guide_active: Color::from_rgba8(79, 70, 229, 255),
            midpoint_segment: Color::from_rgba8(110, 231, 183, 255),
            midpoint_dot: Color::from_rgba8(239, 68, 68, 255),
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The editor to render.
    pub editor: &'a Editor,
    /// Surface size in screen pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    pub theme: Theme,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(editor: &'a Editor, viewport_size: Size) -> Self {
        Self {
            editor,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            theme: Theme::default(),
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the output for a frame.
    ///
    /// Called once per frame; implementations replace any previous frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
