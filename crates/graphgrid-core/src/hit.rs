//! Hit-testing of connectable elements at a world point.

use crate::model::{Connectable, Diagram, TextNode, Vertex};
use crate::viewport::Viewport;
use kurbo::{Point, Rect};

/// Font size, in screen pixels, used for text nodes.
pub const TEXT_FONT_SIZE: f64 = 14.0;

/// Measures rendered text.
pub trait TextMetrics {
    /// Width in pixels of `text` drawn at `font_size` pixels.
    fn width(&self, text: &str, font_size: f64) -> f64;
}

/// Fixed-advance approximation used when no font backend is available.
#[derive(Debug, Clone, Copy)]
pub struct ApproxTextMetrics {
    /// Advance of one character as a fraction of the font size.
    pub advance: f64,
}

impl Default for ApproxTextMetrics {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMetrics for ApproxTextMetrics {
    fn width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.advance
    }
}

/// Hit-testing against a single diagram at the current view.
pub struct SpatialQuery<'a> {
    pub diagram: &'a Diagram,
    pub viewport: &'a Viewport,
    pub vertex_radius: f64,
    pub metrics: &'a dyn TextMetrics,
}

impl<'a> SpatialQuery<'a> {
    pub fn new(
        diagram: &'a Diagram,
        viewport: &'a Viewport,
        vertex_radius: f64,
        metrics: &'a dyn TextMetrics,
    ) -> Self {
        Self {
            diagram,
            viewport,
            vertex_radius,
            metrics,
        }
    }

    /// First vertex whose center lies within the vertex radius (inclusive).
    ///
    /// Squares and hexagons are tested as circles too.
    pub fn vertex_at(&self, world: Point) -> Option<&'a Vertex> {
        self.diagram
            .vertices
            .iter()
            .find(|v| (v.position() - world).hypot() <= self.vertex_radius)
    }

    /// World-space box of a text node, centered on its position.
    pub fn text_bounds(&self, node: &TextNode) -> Rect {
        let scale = self.viewport.scale();
        let width = self.metrics.width(&node.text, TEXT_FONT_SIZE) / scale;
        let height = TEXT_FONT_SIZE / scale;
        Rect::from_center_size(node.position(), (width, height))
    }

    /// First text node whose box contains the point (edges inclusive).
    pub fn text_node_at(&self, world: Point) -> Option<&'a TextNode> {
        self.diagram.text_nodes.iter().find(|node| {
            let r = self.text_bounds(node);
            world.x >= r.x0 && world.x <= r.x1 && world.y >= r.y0 && world.y <= r.y1
        })
    }

    /// Vertex or text node under the point. Vertices take priority.
    pub fn connectable_at(&self, world: Point) -> Option<Connectable<'a>> {
        self.vertex_at(world)
            .map(Connectable::Vertex)
            .or_else(|| self.text_node_at(world).map(Connectable::Text))
    }
}
