//! Edge geometry: drawable paths, arrowhead poses and label placement.

use crate::config::EditorConfig;
use crate::model::{Connectable, Diagram, Edge, EdgeDirection, EdgeId};
use kurbo::{Affine, BezPath, Circle, Line, Point, QuadBez, Shape, Vec2};
use std::f64::consts::{FRAC_PI_2, PI};

/// Loop circle radius as a multiple of the vertex radius.
pub const LOOP_RADIUS_FACTOR: f64 = 1.8;

/// Arrowheads are dropped when the endpoints are closer than this multiple of the
/// destination radius.
pub const ARROW_SUPPRESS_FACTOR: f64 = 1.5;

const PATH_TOLERANCE: f64 = 0.1;

/// World-space sizes used when planning a frame at a given scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryParams {
    pub vertex_radius: f64,
    /// Arrowhead length in world units.
    pub arrow_length: f64,
    /// Perpendicular label offset in world units.
    pub label_offset: f64,
}

impl GeometryParams {
    /// Convert the configured screen sizes to world units at `scale`.
    pub fn for_scale(config: &EditorConfig, scale: f64) -> Self {
        Self {
            vertex_radius: config.vertex_radius,
            arrow_length: config.arrow_length / scale,
            label_offset: config.label_offset / scale,
        }
    }
}

/// Position and backoff radius of an edge end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEndpoint {
    pub position: Point,
    /// Vertex radius, or zero for text nodes.
    pub radius: f64,
}

/// Drawable shape of an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgePath {
    Straight(Line),
    Curved(QuadBez),
    Loop(Circle),
}

impl EdgePath {
    /// Point used for the tangent at the destination, if the path bends.
    pub fn control_point(&self) -> Option<Point> {
        match self {
            EdgePath::Straight(_) => None,
            EdgePath::Curved(quad) => Some(quad.p1),
            EdgePath::Loop(circle) => Some(circle.center),
        }
    }

    pub fn to_bez_path(&self) -> BezPath {
        match self {
            EdgePath::Straight(line) => line.to_path(PATH_TOLERANCE),
            EdgePath::Curved(quad) => quad.to_path(PATH_TOLERANCE),
            EdgePath::Loop(circle) => circle.to_path(PATH_TOLERANCE),
        }
    }
}

/// Placement of an arrowhead triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowheadPose {
    pub tip: Point,
    /// Direction the arrow points, in radians.
    pub angle: f64,
    pub length: f64,
}

impl ArrowheadPose {
    /// Closed triangle with its tip at `tip`, base `length` behind it.
    pub fn to_path(&self) -> BezPath {
        let h = self.length;
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((-h, h / 2.0));
        path.line_to((-h, -h / 2.0));
        path.close_path();
        path.apply_affine(Affine::translate(self.tip.to_vec2()) * Affine::rotate(self.angle));
        path
    }
}

/// Placement of an edge label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPose {
    /// Point the label frame is rotated about.
    pub anchor: Point,
    /// Rotation in radians, always within `[-π/2, π/2]`.
    pub angle: f64,
    /// Distance from the anchor perpendicular to the tangent.
    pub offset: f64,
}

impl LabelPose {
    /// Center of the label text in world coordinates.
    pub fn position(&self) -> Point {
        let up = Vec2::new(self.angle.sin(), -self.angle.cos());
        self.anchor + up * self.offset
    }
}

/// Everything needed to draw one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGeometry {
    pub edge: EdgeId,
    pub path: EdgePath,
    pub arrowhead: Option<ArrowheadPose>,
    pub label: Option<LabelPose>,
}

/// Fold an angle into `[-π/2, π/2]` so text never renders upside down.
pub fn upright_angle(angle: f64) -> f64 {
    if !(-FRAC_PI_2..=FRAC_PI_2).contains(&angle) {
        let flipped = angle + PI;
        if flipped > PI { flipped - 2.0 * PI } else { flipped }
    } else {
        angle
    }
}

/// Arrowhead pointing into `to`, or `None` when the endpoints are too close.
pub fn arrowhead(
    from: EdgeEndpoint,
    to: EdgeEndpoint,
    control: Option<Point>,
    length: f64,
) -> Option<ArrowheadPose> {
    if (to.position - from.position).hypot() < to.radius * ARROW_SUPPRESS_FACTOR {
        return None;
    }
    let tangent = to.position - control.unwrap_or(from.position);
    let angle = tangent.y.atan2(tangent.x);
    let tip = to.position - Vec2::from_angle(angle) * to.radius;
    Some(ArrowheadPose { tip, angle, length })
}

/// Compute the drawable geometry of an edge between resolved endpoints.
pub fn plan_edge(
    edge: &Edge,
    from: EdgeEndpoint,
    to: EdgeEndpoint,
    params: &GeometryParams,
) -> EdgeGeometry {
    let path = if edge.is_loop() {
        let theta = edge.loop_position.unwrap_or_default().angle();
        let radius = LOOP_RADIUS_FACTOR * params.vertex_radius;
        let center = from.position + Vec2::from_angle(theta) * radius;
        EdgePath::Loop(Circle::new(center, radius))
    } else {
        let d = to.position - from.position;
        let len = d.hypot();
        if edge.bend != 0.0 && len > 0.0 {
            let normal = Vec2::new(-d.y / len, d.x / len);
            let control = from.position.midpoint(to.position) + normal * edge.bend;
            EdgePath::Curved(QuadBez::new(from.position, control, to.position))
        } else {
            EdgePath::Straight(Line::new(from.position, to.position))
        }
    };

    let control = path.control_point();
    let arrowhead = match edge.direction {
        EdgeDirection::Undirected => None,
        EdgeDirection::Forward => arrowhead(from, to, control, params.arrow_length),
        EdgeDirection::Backward => arrowhead(to, from, control, params.arrow_length),
    };

    let label = (!edge.label.is_empty()).then(|| match path {
        EdgePath::Loop(circle) => {
            let outward = circle.center - from.position;
            let outward = if outward.hypot() > 0.0 {
                outward / outward.hypot()
            } else {
                Vec2::new(0.0, -1.0)
            };
            LabelPose {
                anchor: circle.center + outward * circle.radius,
                angle: 0.0,
                offset: params.label_offset,
            }
        }
        _ => {
            let tangent = to.position - control.unwrap_or(from.position);
            LabelPose {
                anchor: from.position.midpoint(to.position),
                angle: upright_angle(tangent.y.atan2(tangent.x)),
                offset: params.label_offset,
            }
        }
    });

    EdgeGeometry {
        edge: edge.id,
        path,
        arrowhead,
        label,
    }
}

/// Plan every edge of a diagram, skipping edges whose endpoints no longer exist.
pub fn plan_diagram_edges(diagram: &Diagram, params: &GeometryParams) -> Vec<EdgeGeometry> {
    diagram
        .edges
        .iter()
        .filter_map(|edge| {
            let (Some(from), Some(to)) = (diagram.connectable(edge.from), diagram.connectable(edge.to))
            else {
                log::warn!(
                    "diagram {:?}: skipping edge {} with a missing endpoint",
                    diagram.name,
                    edge.id
                );
                return None;
            };
            let endpoint = |c: Connectable<'_>| EdgeEndpoint {
                position: c.position(),
                radius: c.radius(params.vertex_radius),
            };
            Some(plan_edge(edge, endpoint(from), endpoint(to), params))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LoopPosition;

    const EPS: f64 = 1e-9;

    fn params() -> GeometryParams {
        GeometryParams {
            vertex_radius: 20.0,
            arrow_length: 10.0,
            label_offset: 10.0,
        }
    }

    fn vertex_end(x: f64, y: f64) -> EdgeEndpoint {
        EdgeEndpoint {
            position: Point::new(x, y),
            radius: 20.0,
        }
    }

    #[test]
    fn test_straight_edge() {
        let edge = Edge::new(1, 1, 2);
        let geometry = plan_edge(&edge, vertex_end(0.0, 0.0), vertex_end(100.0, 0.0), &params());
        assert!(matches!(geometry.path, EdgePath::Straight(_)));
        assert!(geometry.arrowhead.is_none());
        assert!(geometry.label.is_none());
    }

    #[test]
    fn test_curved_control_point() {
        let mut edge = Edge::new(1, 1, 2);
        edge.bend = 30.0;
        let geometry = plan_edge(&edge, vertex_end(0.0, 0.0), vertex_end(100.0, 0.0), &params());
        let EdgePath::Curved(quad) = geometry.path else {
            panic!("expected a curve");
        };
        // Normal of (100, 0) is (0, 1).
        assert!((quad.p1 - Point::new(50.0, 30.0)).hypot() < EPS);
    }

    #[test]
    fn test_zero_length_bend_falls_back_to_straight() {
        let mut edge = Edge::new(1, 1, 2);
        edge.bend = 30.0;
        let geometry = plan_edge(&edge, vertex_end(5.0, 5.0), vertex_end(5.0, 5.0), &params());
        assert!(matches!(geometry.path, EdgePath::Straight(_)));
    }

    #[test]
    fn test_loop_positions() {
        let cases = [
            (LoopPosition::Above, Point::new(0.0, -36.0)),
            (LoopPosition::Below, Point::new(0.0, 36.0)),
            (LoopPosition::Left, Point::new(-36.0, 0.0)),
            (LoopPosition::Right, Point::new(36.0, 0.0)),
        ];
        for (position, center) in cases {
            let mut edge = Edge::new(1, 1, 1);
            edge.loop_position = Some(position);
            let geometry = plan_edge(&edge, vertex_end(0.0, 0.0), vertex_end(0.0, 0.0), &params());
            let EdgePath::Loop(circle) = geometry.path else {
                panic!("expected a loop");
            };
            assert!((circle.center - center).hypot() < EPS, "{position:?}");
            assert!((circle.radius - 36.0).abs() < EPS);
        }
    }

    #[test]
    fn test_arrowhead_backoff() {
        let mut edge = Edge::new(1, 1, 2);
        edge.direction = EdgeDirection::Forward;
        let geometry = plan_edge(&edge, vertex_end(0.0, 0.0), vertex_end(100.0, 0.0), &params());
        let arrow = geometry.arrowhead.unwrap();
        assert!((arrow.tip - Point::new(80.0, 0.0)).hypot() < EPS);
        assert!(arrow.angle.abs() < EPS);

        edge.direction = EdgeDirection::Backward;
        let geometry = plan_edge(&edge, vertex_end(0.0, 0.0), vertex_end(100.0, 0.0), &params());
        let arrow = geometry.arrowhead.unwrap();
        assert!((arrow.tip - Point::new(20.0, 0.0)).hypot() < EPS);
        assert!((arrow.angle.abs() - PI).abs() < EPS);
    }

    #[test]
    fn test_arrowhead_to_text_has_no_backoff() {
        let to = EdgeEndpoint {
            position: Point::new(0.0, 50.0),
            radius: 0.0,
        };
        let arrow = arrowhead(vertex_end(0.0, 0.0), to, None, 10.0).unwrap();
        assert!((arrow.tip - Point::new(0.0, 50.0)).hypot() < EPS);
        assert!((arrow.angle - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_arrowhead_suppressed_when_close() {
        assert!(arrowhead(vertex_end(0.0, 0.0), vertex_end(29.9, 0.0), None, 10.0).is_none());
        assert!(arrowhead(vertex_end(0.0, 0.0), vertex_end(30.0, 0.0), None, 10.0).is_some());

        // Loops on vertices never get an arrowhead.
        let mut edge = Edge::new(1, 1, 1);
        edge.direction = EdgeDirection::Forward;
        let geometry = plan_edge(&edge, vertex_end(0.0, 0.0), vertex_end(0.0, 0.0), &params());
        assert!(geometry.arrowhead.is_none());
    }

    #[test]
    fn test_curved_arrowhead_follows_control_tangent() {
        let mut edge = Edge::new(1, 1, 2);
        edge.bend = 50.0;
        edge.direction = EdgeDirection::Forward;
        let geometry = plan_edge(&edge, vertex_end(0.0, 0.0), vertex_end(100.0, 0.0), &params());
        let arrow = geometry.arrowhead.unwrap();
        // Control point (50, 50) -> destination (100, 0) points down-right at -45 degrees.
        assert!((arrow.angle + PI / 4.0).abs() < EPS);
        let expected = Point::new(100.0, 0.0) - Vec2::from_angle(-PI / 4.0) * 20.0;
        assert!((arrow.tip - expected).hypot() < EPS);
    }

    #[test]
    fn test_label_pose_flips_upright() {
        let mut edge = Edge::new(1, 1, 2);
        edge.label = "a_1".into();
        let geometry = plan_edge(&edge, vertex_end(100.0, 0.0), vertex_end(0.0, 0.0), &params());
        let label = geometry.label.unwrap();
        assert!((label.anchor - Point::new(50.0, 0.0)).hypot() < EPS);
        assert!(label.angle.abs() < EPS);
        // Offset is perpendicular, towards negative y in the label frame.
        assert!((label.position() - Point::new(50.0, -10.0)).hypot() < EPS);
    }

    #[test]
    fn test_upright_angle() {
        assert!((upright_angle(PI * 0.75) + PI * 0.25).abs() < EPS);
        assert!((upright_angle(-PI * 0.75) - PI * 0.25).abs() < EPS);
        assert!((upright_angle(FRAC_PI_2) - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_loop_label_at_apex() {
        let mut edge = Edge::new(1, 1, 1);
        edge.label = "x".into();
        let geometry = plan_edge(&edge, vertex_end(0.0, 0.0), vertex_end(0.0, 0.0), &params());
        let label = geometry.label.unwrap();
        assert!((label.anchor - Point::new(0.0, -72.0)).hypot() < EPS);
        assert_eq!(label.angle, 0.0);
    }

    #[test]
    fn test_dangling_edges_skipped() {
        let mut diagram = Diagram::new("Graph 1");
        diagram.add_vertex(Point::ZERO);
        diagram.add_vertex(Point::new(100.0, 0.0));
        diagram.add_edge(1, 2).unwrap();
        diagram.edges.push(Edge::new(2, 1, 99));
        let planned = plan_diagram_edges(&diagram, &params());
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].edge, 1);
    }
}
