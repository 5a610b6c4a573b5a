//! Snap functionality for aligning a dragged element to the other elements.

use crate::model::{Diagram, ElementRef};
use kurbo::Point;
use std::collections::HashSet;

/// Snap distance in screen pixels.
pub const SNAP_THRESHOLD: f64 = 10.0;

/// Hashable identity of a coordinate; `0.0` and `-0.0` compare equal as floats, so share a key.
fn coordinate_key(value: f64) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
    /// Whether the point snapped onto a midpoint.
    pub midpoint: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
            midpoint: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// An element that contributes snap candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapAnchor {
    /// Index of the diagram the element belongs to.
    pub diagram: usize,
    pub element: ElementRef,
    pub position: Point,
}

/// Midpoint between two anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Midpoint {
    pub point: Point,
    pub a: SnapAnchor,
    pub b: SnapAnchor,
}

/// Snap candidates for one drag gesture and the ones currently matched.
#[derive(Debug, Clone, Default)]
pub struct SnapGuides {
    active: bool,
    xs: Vec<f64>,
    ys: Vec<f64>,
    midpoints: Vec<Midpoint>,
    active_x: Option<f64>,
    active_y: Option<f64>,
    active_midpoint: Option<Midpoint>,
}

impl SnapGuides {
    /// Collect candidates from every diagram.
    ///
    /// `dragged` is excluded only from the diagram at `active_index`; an element
    /// with the same id elsewhere still contributes. Midpoints of coincident
    /// pairs are skipped and duplicate midpoint positions keep the first pair.
    pub fn compute(diagrams: &[Diagram], active_index: usize, dragged: Option<ElementRef>) -> Self {
        let anchors: Vec<SnapAnchor> = diagrams
            .iter()
            .enumerate()
            .flat_map(|(index, diagram)| {
                diagram.connectables().filter_map(move |c| {
                    let excluded = index == active_index
                        && dragged.is_some_and(|d| d.id == c.id());
                    (!excluded).then(|| SnapAnchor {
                        diagram: index,
                        element: c.element_ref(),
                        position: c.position(),
                    })
                })
            })
            .collect();

        let mut seen_x = HashSet::new();
        let mut seen_y = HashSet::new();
        let xs: Vec<f64> = anchors
            .iter()
            .map(|a| a.position.x)
            .filter(|x| seen_x.insert(coordinate_key(*x)))
            .collect();
        let ys: Vec<f64> = anchors
            .iter()
            .map(|a| a.position.y)
            .filter(|y| seen_y.insert(coordinate_key(*y)))
            .collect();

        let mut seen_midpoints = HashSet::new();
        let mut midpoints: Vec<Midpoint> = Vec::new();
        for (i, a) in anchors.iter().enumerate() {
            for b in &anchors[i + 1..] {
                if a.position == b.position {
                    continue;
                }
                let point = a.position.midpoint(b.position);
                if seen_midpoints.insert((coordinate_key(point.x), coordinate_key(point.y))) {
                    midpoints.push(Midpoint { point, a: *a, b: *b });
                }
            }
        }

        log::debug!(
            "snap guides: {} x, {} y, {} midpoints",
            xs.len(),
            ys.len(),
            midpoints.len()
        );

        Self {
            active: true,
            xs,
            ys,
            midpoints,
            active_x: None,
            active_y: None,
            active_midpoint: None,
        }
    }

    /// Snap a world point. `tolerance` is in world units.
    ///
    /// Midpoints are checked first and win outright; otherwise X and Y snap
    /// independently to the first candidate strictly within tolerance.
    pub fn snap(&mut self, point: Point, tolerance: f64) -> SnapResult {
        self.active_x = None;
        self.active_y = None;
        self.active_midpoint = None;

        if let Some(mid) = self
            .midpoints
            .iter()
            .find(|m| (point - m.point).hypot() < tolerance)
        {
            self.active_midpoint = Some(*mid);
            return SnapResult {
                point: mid.point,
                snapped_x: true,
                snapped_y: true,
                midpoint: true,
            };
        }

        let mut result = SnapResult::none(point);
        if let Some(&x) = self.xs.iter().find(|&&x| (point.x - x).abs() < tolerance) {
            self.active_x = Some(x);
            result.point.x = x;
            result.snapped_x = true;
        }
        if let Some(&y) = self.ys.iter().find(|&&y| (point.y - y).abs() < tolerance) {
            self.active_y = Some(y);
            result.point.y = y;
            result.snapped_y = true;
        }
        result
    }

    /// Drop all candidates; guides are hidden until the next drag.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether guides should be displayed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn midpoints(&self) -> &[Midpoint] {
        &self.midpoints
    }

    pub fn active_x(&self) -> Option<f64> {
        self.active_x
    }

    pub fn active_y(&self) -> Option<f64> {
        self.active_y
    }

    pub fn active_midpoint(&self) -> Option<&Midpoint> {
        self.active_midpoint.as_ref()
    }
}
