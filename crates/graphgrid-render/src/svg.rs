//! SVG backend: serializes a planned frame as a standalone SVG document.

use crate::plan::{plan_frame, DrawCommand, DrawList};
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use kurbo::Size;
use peniko::Color;
use std::fmt::Write;

/// Renders frames to SVG text.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: String,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// SVG of the last built frame.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Take the SVG of the last built frame, leaving the renderer empty.
    pub fn take_document(&mut self) -> String {
        std::mem::take(&mut self.document)
    }

    /// Serialize an already planned frame.
    pub fn write_list(
        &mut self,
        list: &DrawList,
        size: Size,
        background: Color,
    ) -> RenderResult<()> {
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(RendererError::InvalidSize(size));
        }
        let mut out = String::new();
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = size.width,
            h = size.height
        )?;
        writeln!(
            out,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            css_color(background)
        )?;
        let [a, b, c, d, e, f] = list.transform.as_coeffs();
        writeln!(out, r#"<g transform="matrix({a} {b} {c} {d} {e} {f})">"#)?;
        for command in &list.commands {
            write_command(&mut out, command)?;
        }
        out.push_str("</g>\n</svg>\n");
        self.document = out;
        Ok(())
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let list = plan_frame(ctx);
        let background = self.background_color(ctx);
        self.write_list(&list, ctx.viewport_size, background)
    }
}

fn css_color(color: Color) -> String {
    let rgba = color.to_rgba8();
    if rgba.a == 255 {
        format!("rgb({},{},{})", rgba.r, rgba.g, rgba.b)
    } else {
        format!(
            "rgba({},{},{},{:.3})",
            rgba.r,
            rgba.g,
            rgba.b,
            f64::from(rgba.a) / 255.0
        )
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn write_command(out: &mut String, command: &DrawCommand) -> std::fmt::Result {
    match command {
        DrawCommand::Stroke {
            path,
            color,
            width,
            dashes,
        } => {
            write!(
                out,
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}""#,
                path.to_svg(),
                css_color(*color),
                width
            )?;
            if !dashes.is_empty() {
                let pattern: Vec<String> = dashes.iter().map(|d| d.to_string()).collect();
                write!(out, r#" stroke-dasharray="{}""#, pattern.join(" "))?;
            }
            writeln!(out, "/>")
        }
        DrawCommand::Fill { path, color } => writeln!(
            out,
            r#"<path d="{}" fill="{}"/>"#,
            path.to_svg(),
            css_color(*color)
        ),
        DrawCommand::Text {
            text,
            position,
            style,
        } => {
            write!(
                out,
                r#"<text x="{x}" y="{y}" font-family="Inter, sans-serif" font-size="{}" fill="{}" text-anchor="middle" dominant-baseline="middle""#,
                style.size,
                css_color(style.color),
                x = position.x,
                y = position.y
            )?;
            if style.bold {
                out.push_str(r#" font-weight="bold""#);
            }
            if style.angle != 0.0 {
                write!(
                    out,
                    r#" transform="rotate({} {} {})""#,
                    style.angle.to_degrees(),
                    position.x,
                    position.y
                )?;
            }
            writeln!(out, ">{}</text>", escape(text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphgrid_core::{Editor, EditorConfig, Scene};
    use kurbo::Point;

    fn editor() -> Editor {
        let mut editor = Editor::new(Scene::default(), EditorConfig::default());
        let diagram = editor.scene_mut().active_mut();
        diagram.add_vertex(Point::new(10.0, 20.0));
        diagram.add_text_node(Point::new(60.0, 20.0), "a < b & c");
        editor
    }

    #[test]
    fn test_build_scene() {
        let editor = editor();
        let mut renderer = SvgRenderer::new();
        let ctx = RenderContext::new(&editor, Size::new(640.0, 480.0));
        renderer.build_scene(&ctx).unwrap();

        let svg = renderer.document();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 640 480""#));
        assert!(svg.contains(r#"fill="rgb(147,197,253)""#));
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains(">v1</text>"));
        assert!(svg.contains(">a &lt; b &amp; c</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_view_transform_applied() {
        let mut editor = editor();
        editor.viewport_mut().offset = kurbo::Vec2::new(5.0, 7.0);
        editor.viewport_mut().set_scale(2.0);
        let mut renderer = SvgRenderer::new();
        let ctx = RenderContext::new(&editor, Size::new(100.0, 100.0));
        renderer.build_scene(&ctx).unwrap();
        assert!(renderer.document().contains(r#"transform="matrix(2 0 0 2 5 7)""#));
    }

    #[test]
    fn test_empty_surface_rejected() {
        let editor = editor();
        let mut renderer = SvgRenderer::new();
        let ctx = RenderContext::new(&editor, Size::new(0.0, 100.0));
        assert!(matches!(
            renderer.build_scene(&ctx),
            Err(RendererError::InvalidSize(_))
        ));
        assert!(renderer.take_document().is_empty());
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(Color::from_rgba8(1, 2, 3, 255)), "rgb(1,2,3)");
        assert_eq!(css_color(Color::from_rgba8(1, 2, 3, 0)), "rgba(1,2,3,0.000)");
    }
}
