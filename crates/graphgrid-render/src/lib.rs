//! GraphGrid Render Library
//!
//! Turns the editor state into a backend-neutral draw list and renders it.
//! The bundled backend writes SVG.

mod plan;
mod renderer;
mod svg;

pub use plan::{plan_frame, vertex_outline, DrawCommand, DrawList, TextStyle};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError, Theme};
pub use svg::SvgRenderer;
