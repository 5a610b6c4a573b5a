//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::Serialize;

/// Smallest allowed scale.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed scale.
pub const MAX_SCALE: f64 = 5.0;
/// Multiplicative zoom applied per wheel notch.
pub const ZOOM_STEP: f64 = 1.1;

/// Zoom direction of a single wheel step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Negative vertical wheel delta zooms in, anything else zooms out.
    pub fn from_wheel_delta(dy: f64) -> Self {
        if dy < 0.0 { ZoomDirection::In } else { ZoomDirection::Out }
    }
}

/// Viewport manages the view transform of one rendering surface.
///
/// `screen = world * scale + offset`. The scale is kept within
/// `[min_scale, max_scale]` by every mutator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    /// Current translation offset in screen pixels.
    pub offset: Vec2,
    scale: f64,
    min_scale: f64,
    max_scale: f64,
    zoom_step: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport with custom scale limits and zoom step.
    ///
    /// Limits must be positive and finite and the step greater than 1; any
    /// value that is not falls back to its default.
    pub fn with_limits(min_scale: f64, max_scale: f64, zoom_step: f64) -> Self {
        let positive = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 { value } else { fallback }
        };
        let (a, b) = (positive(min_scale, MIN_SCALE), positive(max_scale, MAX_SCALE));
        let (min_scale, max_scale) = if a <= b { (a, b) } else { (b, a) };
        let zoom_step = if zoom_step.is_finite() && zoom_step > 1.0 {
            zoom_step
        } else {
            ZOOM_STEP
        };
        Self {
            offset: Vec2::ZERO,
            scale: 1.0_f64.clamp(min_scale, max_scale),
            min_scale,
            max_scale,
            zoom_step,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn scale_range(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    /// Set the scale directly, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(self.min_scale, self.max_scale);
        }
    }

    /// World to screen transform, for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Screen to world transform, for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.offset.x,
            world.y * self.scale + self.offset.y,
        )
    }

    /// Convert a screen distance to world units at the current scale.
    pub fn screen_len(&self, pixels: f64) -> f64 {
        pixels / self.scale
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom one step, keeping the world point under `screen` fixed.
    pub fn zoom_at(&mut self, screen: Point, direction: ZoomDirection) {
        let factor = match direction {
            ZoomDirection::In => self.zoom_step,
            ZoomDirection::Out => 1.0 / self.zoom_step,
        };
        self.zoom_to(screen, self.scale * factor);
    }

    /// Zoom to an absolute scale, keeping the world point under `screen` fixed.
    pub fn zoom_to(&mut self, screen: Point, scale: f64) {
        if !scale.is_finite() {
            return;
        }
        let before = self.to_world(screen);
        self.scale = scale.clamp(self.min_scale, self.max_scale);
        let after = self.to_world(screen);
        self.offset += (after - before) * self.scale;
    }

    /// World-space rectangle visible on a surface of the given size.
    pub fn visible_world_rect(&self, size: Size) -> Rect {
        Rect::from_points(
            self.to_world(Point::ZERO),
            self.to_world(Point::new(size.width, size.height)),
        )
    }

    /// Reset to identity.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.scale = 1.0_f64.clamp(self.min_scale, self.max_scale);
    }
}
