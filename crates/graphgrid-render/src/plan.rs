//! Frame planning: editor state to an ordered list of world-space draw commands.

use crate::renderer::{RenderContext, Theme};
use graphgrid_core::geometry::EdgeGeometry;
use graphgrid_core::model::{Diagram, EdgeStyle, ElementRef, Vertex, VertexShape};
use graphgrid_core::palette::Rgb;
use graphgrid_core::snap::SnapGuides;
use graphgrid_core::Editor;
use kurbo::{Affine, BezPath, Circle, Line, Point, Rect, Shape};
use peniko::Color;

const PATH_TOLERANCE: f64 = 0.1;

/// Fill used for vertices without a color.
const DEFAULT_VERTEX_RGB: Rgb = Rgb::new(147, 197, 253);

/// Squares and hexagons are drawn slightly inside the hit circle.
const POLYGON_INSET: f64 = 0.95;

/// Font and placement of a text command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in world units.
    pub size: f64,
    pub bold: bool,
    pub color: Color,
    /// Rotation about the text position, in radians.
    pub angle: f64,
}

/// One drawing operation in world coordinates.
///
/// Text is centered horizontally and vertically on its position.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
        /// Dash pattern in world units; empty for a solid line.
        dashes: Vec<f64>,
    },
    Fill {
        path: BezPath,
        color: Color,
    },
    Text {
        text: String,
        position: Point,
        style: TextStyle,
    },
}

/// Commands for one frame, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    /// World to screen transform.
    pub transform: Affine,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    fn stroke(&mut self, path: BezPath, color: Color, width: f64, dashes: Vec<f64>) {
        self.commands.push(DrawCommand::Stroke {
            path,
            color,
            width,
            dashes,
        });
    }

    fn fill(&mut self, path: BezPath, color: Color) {
        self.commands.push(DrawCommand::Fill { path, color });
    }

    fn text(&mut self, text: impl Into<String>, position: Point, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            position,
            style,
        });
    }
}

fn line_path(from: Point, to: Point) -> BezPath {
    Line::new(from, to).to_path(PATH_TOLERANCE)
}

/// Outline of a vertex of the given shape centered at `center`.
///
/// Circles use `radius`; squares and hexagons are inset.
pub fn vertex_outline(shape: VertexShape, center: Point, radius: f64) -> BezPath {
    match shape {
        VertexShape::Circle => Circle::new(center, radius).to_path(PATH_TOLERANCE),
        VertexShape::Square => {
            let r = radius * POLYGON_INSET;
            Rect::new(center.x - r, center.y - r, center.x + r, center.y + r).to_path(PATH_TOLERANCE)
        }
        VertexShape::Hexagon => {
            let r = radius * POLYGON_INSET;
            let mut path = BezPath::new();
            path.move_to((center.x + r, center.y));
            for i in 1..6 {
                let angle = f64::from(i) * std::f64::consts::FRAC_PI_3;
                path.line_to((center.x + r * angle.cos(), center.y + r * angle.sin()));
            }
            path.close_path();
            path
        }
    }
}

/// Plan a complete frame.
///
/// Paint order: snap guides, edge preview, edges, vertices, text nodes.
pub fn plan_frame(ctx: &RenderContext) -> DrawList {
    let editor = ctx.editor;
    let viewport = editor.viewport();
    let mut list = DrawList {
        transform: viewport.transform(),
        commands: Vec::new(),
    };
    let scale = viewport.scale();
    let theme = &ctx.theme;
    let diagram = editor.scene().active();

    let visible = viewport.visible_world_rect(ctx.viewport_size);
    plan_guides(&mut list, editor.guides(), visible, scale, theme);

    if let Some(preview) = editor.edge_preview() {
        list.stroke(
            line_path(preview.p0, preview.p1),
            theme.edge_preview,
            2.0 / scale,
            vec![5.0, 5.0],
        );
    }

    for geometry in editor.plan_edges() {
        plan_edge(&mut list, diagram, &geometry, scale, theme);
    }

    for vertex in &diagram.vertices {
        plan_vertex(&mut list, editor, vertex, scale, theme);
    }

    for node in &diagram.text_nodes {
        list.text(
            node.text.clone(),
            node.position(),
            TextStyle {
                size: 14.0 / scale,
                bold: false,
                color: node.color.map(Color::from).unwrap_or(theme.text),
                angle: 0.0,
            },
        );
    }

    log::trace!("planned {} draw commands", list.commands.len());
    list
}

fn plan_guides(list: &mut DrawList, guides: &SnapGuides, visible: Rect, scale: f64, theme: &Theme) {
    if !guides.is_active() {
        return;
    }
    let vertical = |x: f64| line_path(Point::new(x, visible.y0), Point::new(x, visible.y1));
    let horizontal = |y: f64| line_path(Point::new(visible.x0, y), Point::new(visible.x1, y));

    for &x in guides.xs() {
        list.stroke(vertical(x), theme.guide, 0.5 / scale, Vec::new());
    }
    for &y in guides.ys() {
        list.stroke(horizontal(y), theme.guide, 0.5 / scale, Vec::new());
    }
    let dash = 4.0 / scale;
    for mid in guides.midpoints() {
        list.stroke(
            line_path(mid.a.position, mid.b.position),
            theme.midpoint_segment,
            0.5 / scale,
            vec![dash, dash],
        );
    }
    for mid in guides.midpoints() {
        list.fill(
            Circle::new(mid.point, 3.0 / scale).to_path(PATH_TOLERANCE),
            theme.midpoint_dot,
        );
    }

    let active_width = 1.0 / scale;
    if let Some(x) = guides.active_x() {
        list.stroke(vertical(x), theme.guide_active, active_width, Vec::new());
    }
    if let Some(y) = guides.active_y() {
        list.stroke(horizontal(y), theme.guide_active, active_width, Vec::new());
    }
    if let Some(mid) = guides.active_midpoint() {
        list.stroke(
            line_path(mid.a.position, mid.b.position),
            theme.guide_active,
            active_width,
            Vec::new(),
        );
    }
}

fn plan_edge(list: &mut DrawList, diagram: &Diagram, geometry: &EdgeGeometry, scale: f64, theme: &Theme) {
    let Some(edge) = diagram.edge(geometry.edge) else {
        return;
    };
    let color = edge.color.map(Color::from).unwrap_or(theme.edge);
    let dashes = match edge.style {
        EdgeStyle::Solid => Vec::new(),
        EdgeStyle::Dashed => vec![5.0, 5.0],
        EdgeStyle::Dotted => vec![2.0, 3.0],
    };
    list.stroke(geometry.path.to_bez_path(), color, 2.0 / scale, dashes);

    if let Some(arrow) = &geometry.arrowhead {
        list.fill(arrow.to_path(), color);
    }
    if let Some(label) = &geometry.label {
        list.text(
            edge.label.clone(),
            label.position(),
            TextStyle {
                size: 12.0 / scale,
                bold: false,
                color: theme.edge_label,
                angle: label.angle,
            },
        );
    }
}

fn plan_vertex(list: &mut DrawList, editor: &Editor, vertex: &Vertex, scale: f64, theme: &Theme) {
    let element = ElementRef::vertex(vertex.id);
    let outline = vertex_outline(vertex.shape, vertex.position(), editor.config().vertex_radius);
    let fill = vertex.color.unwrap_or(DEFAULT_VERTEX_RGB);
    let stroke_color = if editor.edge_start() == Some(element) {
        theme.edge_start_stroke
    } else {
        theme.vertex_stroke
    };
    let width = (if editor.dragged_element() == Some(element) { 4.0 } else { 2.0 }) / scale;

    list.fill(outline.clone(), fill.into());
    list.stroke(outline, stroke_color, width, Vec::new());
    list.text(
        vertex.display_label(),
        vertex.position(),
        TextStyle {
            size: 14.0 / scale,
            bold: true,
            color: fill.contrast_text().into(),
            angle: 0.0,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use graphgrid_core::input::{Modifiers, PointerEvent};
    use graphgrid_core::model::EdgeDirection;
    use graphgrid_core::{EditorConfig, Scene, ScriptedPrompter};
    use kurbo::Size;
    use std::time::{Duration, Instant};

    fn editor() -> Editor {
        let mut editor = Editor::new(Scene::default(), EditorConfig::default());
        let diagram = editor.scene_mut().active_mut();
        diagram.add_vertex(Point::new(0.0, 0.0));
        diagram.add_vertex(Point::new(100.0, 0.0));
        diagram.add_text_node(Point::new(50.0, 80.0), "note");
        let edge = diagram.add_edge(1, 2).unwrap();
        let edge = diagram.edge_mut(edge).unwrap();
        edge.direction = EdgeDirection::Forward;
        edge.label = "e1".into();
        editor
    }

    fn send(editor: &mut Editor, events: &[PointerEvent]) {
        let prompter = ScriptedPrompter::new();
        let mut now = Instant::now();
        for &event in events {
            now += Duration::from_secs(1);
            block_on(editor.handle_event_at(event, now, &prompter));
        }
    }

    fn texts(list: &DrawList) -> Vec<&str> {
        list.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_idle_frame_order() {
        let editor = editor();
        let ctx = RenderContext::new(&editor, Size::new(800.0, 600.0));
        let list = plan_frame(&ctx);

        // Edge stroke, arrowhead, label, then two vertices (fill, stroke, label) and the text.
        assert_eq!(list.commands.len(), 3 + 2 * 3 + 1);
        assert!(matches!(list.commands[0], DrawCommand::Stroke { .. }));
        assert!(matches!(list.commands[1], DrawCommand::Fill { .. }));
        assert_eq!(texts(&list), vec!["e1", "v1", "v2", "note"]);
        assert_eq!(list.transform, Affine::IDENTITY);
    }

    #[test]
    fn test_sizes_follow_zoom() {
        let mut editor = editor();
        editor.viewport_mut().set_scale(2.0);
        let ctx = RenderContext::new(&editor, Size::new(800.0, 600.0));
        let list = plan_frame(&ctx);
        let DrawCommand::Stroke { width, .. } = &list.commands[0] else {
            panic!("expected edge stroke first");
        };
        assert_eq!(*width, 1.0);
        let Some(DrawCommand::Text { style, .. }) = list.commands.last() else {
            panic!("expected text node last");
        };
        assert_eq!(style.size, 7.0);
        assert_eq!(style.color, Theme::default().text);
    }

    #[test]
    fn test_vertex_label_contrast() {
        let mut editor = editor();
        editor.scene_mut().active_mut().vertex_mut(2).unwrap().color = Some(Rgb::new(20, 20, 20));
        let ctx = RenderContext::new(&editor, Size::new(800.0, 600.0));
        let list = plan_frame(&ctx);
        let colors: Vec<Color> = list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { style, .. } if style.bold => Some(style.color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![Rgb::BLACK.into(), Rgb::WHITE.into()]);
    }

    #[test]
    fn test_dragging_shows_guides_and_thick_outline() {
        let mut editor = editor();
        send(&mut editor, &[PointerEvent::down((100.0, 0.0))]);
        let ctx = RenderContext::new(&editor, Size::new(800.0, 600.0));
        let list = plan_frame(&ctx);

        // Guides come before the edge; vertex 1 and the text node give x 0 and 50.
        let DrawCommand::Stroke { color, .. } = &list.commands[0] else {
            panic!("expected a guide line first");
        };
        assert_eq!(*color, Theme::default().guide);

        let widths: Vec<f64> = list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Stroke { color, width, .. } if *color == Theme::default().vertex_stroke => {
                    Some(*width)
                }
                _ => None,
            })
            .collect();
        assert_eq!(widths, vec![2.0, 4.0]);
    }

    #[test]
    fn test_edge_preview_and_start_highlight() {
        let mut editor = editor();
        send(
            &mut editor,
            &[
                PointerEvent::down((0.0, 0.0)).with_modifiers(Modifiers::SHIFT),
                PointerEvent::moved((40.0, 40.0)),
            ],
        );
        let ctx = RenderContext::new(&editor, Size::new(800.0, 600.0));
        let list = plan_frame(&ctx);
        let DrawCommand::Stroke { color, dashes, .. } = &list.commands[0] else {
            panic!("expected the preview first");
        };
        assert_eq!(*color, Theme::default().edge_preview);
        assert_eq!(dashes, &vec![5.0, 5.0]);
        assert!(list.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Stroke { color, .. } if *color == Theme::default().edge_start_stroke
        )));
    }

    #[test]
    fn test_dangling_edge_skipped() {
        let mut editor = editor();
        editor.scene_mut().active_mut().edges[0].to = 42;
        let ctx = RenderContext::new(&editor, Size::new(800.0, 600.0));
        let list = plan_frame(&ctx);
        assert_eq!(texts(&list), vec!["v1", "v2", "note"]);
    }

    #[test]
    fn test_vertex_outlines() {
        let center = Point::new(10.0, 10.0);
        let square = vertex_outline(VertexShape::Square, center, 20.0).bounding_box();
        assert!((square.width() - 38.0).abs() < 1e-9);
        let hexagon = vertex_outline(VertexShape::Hexagon, center, 20.0);
        assert_eq!(hexagon.elements().len(), 7);
        assert!((hexagon.bounding_box().x1 - 29.0).abs() < 1e-9);
        let circle = vertex_outline(VertexShape::Circle, center, 20.0).bounding_box();
        assert!((circle.width() - 40.0).abs() < 0.1);
    }
}
