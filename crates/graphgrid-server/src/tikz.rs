//! LaTeX/TikZ generation for a grid of diagrams.

use graphgrid_core::model::{
    Diagram, EdgeDirection, EdgeStyle, ElementId, LoopPosition, VertexShape,
};
use graphgrid_core::palette::{Palette, Rgb};

/// World units per TikZ unit.
const SCALE_FACTOR: f64 = 40.0;

/// Width of each subfigure as a fraction of `\textwidth`.
const SUBFIGURE_WIDTH: &str = "0.45";

/// Output for a request without diagrams.
pub const NO_GRAPHS: &str = "% No graphs to generate.";

const TIKZ_STYLES: [&str; 3] = [
    r"\tikzstyle{node} = [draw, circle, minimum size=0.8cm, inner sep=0pt]",
    r"\tikzstyle{rectangularNode} = [draw, rectangle, minimum size=0.7cm, inner sep=2pt]",
    r"\tikzstyle{hexagonalNode} = [draw, regular polygon, regular polygon sides=6, minimum size=0.6cm, inner sep=1pt]",
];

/// Named colors referenced by the generated code, in first-use order.
#[derive(Debug, Default)]
struct ColorTable {
    entries: Vec<(String, Rgb)>,
}

impl ColorTable {
    /// Register the color of an element and return the name to reference it by.
    ///
    /// Palette colors are named after their entry; others after the element.
    fn name(&mut self, palette: &Palette, rgb: Rgb, prefix: &str, id: u32) -> String {
        let name = match palette.find(rgb) {
            Some(entry) => entry.name.chars().filter(|c| c.is_alphanumeric()).collect(),
            None => format!("{prefix}{id}Color"),
        };
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = rgb,
            None => self.entries.push((name.clone(), rgb)),
        }
        name
    }

    fn definitions(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(name, rgb)| format!(r"\definecolor{{{name}}}{{RGB}}{{{rgb}}}"))
            .collect()
    }
}

fn coordinate(value: f64) -> String {
    format!("{:.3}", value / SCALE_FACTOR)
}

/// `v1`, `x_3` and `ab12` become subscripted math; anything else is returned as `None`.
fn subscript_label(label: &str) -> Option<String> {
    let letters_end = label
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map_or(label.len(), |(i, _)| i);
    if letters_end == 0 {
        return None;
    }
    let (letters, rest) = label.split_at(letters_end);
    let digits = rest.strip_prefix('_').unwrap_or(rest);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("${letters}_{{{digits}}}$"))
}

fn edge_label(label: &str) -> String {
    subscript_label(label.trim()).unwrap_or_else(|| format!("{{{}}}", label.replace('_', " ")))
}

fn ascii_alphanumeric(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Body of the `tikzpicture` for one diagram.
fn diagram_body(diagram: &Diagram, palette: &Palette, colors: &mut ColorTable) -> String {
    let mut body: Vec<String> = Vec::new();

    if !diagram.vertices.is_empty() {
        body.push("% Nodes".to_string());
        for v in &diagram.vertices {
            let style = match v.shape {
                VertexShape::Circle => "node",
                VertexShape::Square => "rectangularNode",
                VertexShape::Hexagon => "hexagonalNode",
            };
            let text = match v.color {
                Some(rgb) if rgb.prefers_light_text() => "white",
                _ => "black",
            };
            let mut options = vec![format!("style={style}"), format!("text={text}")];
            if let Some(rgb) = v.color {
                options.push(format!("fill={}", colors.name(palette, rgb, "v", v.id)));
            }
            let label = v.label.trim();
            let content = if label.is_empty() {
                format!("{{$v_{{{}}}$}}", v.id)
            } else {
                format!("{{{label}}}")
            };
            body.push(format!(
                r"\node[{}] (v{}) at ({},{}) {content};",
                options.join(", "),
                v.id,
                coordinate(v.x),
                coordinate(-v.y)
            ));
        }
    }

    if !diagram.text_nodes.is_empty() {
        body.push("\n% Additional Text".to_string());
        for t in &diagram.text_nodes {
            let mut options = vec!["draw=none".to_string(), "fill=none".to_string()];
            if let Some(rgb) = t.color {
                options.push(format!("text={}", colors.name(palette, rgb, "t", t.id)));
            }
            body.push(format!(
                r"\node[{}] (t{}) at ({},{}) {{{}}};",
                options.join(", "),
                t.id,
                coordinate(t.x),
                coordinate(-t.y),
                t.text.replace('_', r"\_")
            ));
        }
    }

    if !diagram.edges.is_empty() {
        body.push("\n% Edges".to_string());
        let node_name = |id: ElementId| {
            if diagram.vertex(id).is_some() {
                Some(format!("v{id}"))
            } else {
                diagram.text_node(id).map(|_| format!("t{id}"))
            }
        };
        for edge in &diagram.edges {
            let (Some(from), Some(to)) = (node_name(edge.from), node_name(edge.to)) else {
                tracing::debug!("skipping edge {} with a missing endpoint", edge.id);
                continue;
            };
            let mut options: Vec<String> = Vec::new();
            match edge.direction {
                EdgeDirection::Forward => options.push("->".into()),
                EdgeDirection::Backward => options.push("<-".into()),
                EdgeDirection::Undirected => {}
            }
            if let Some(rgb) = edge.color {
                options.push(format!("draw={}", colors.name(palette, rgb, "e", edge.id)));
            }
            if edge.style != EdgeStyle::Solid {
                options.push(edge.style.as_str().into());
            }
            let label = if edge.label.is_empty() {
                String::new()
            } else {
                format!(r"node [auto, font=\small, sloped] {}", edge_label(&edge.label))
            };

            let target = if from == to {
                let position = edge.loop_position.unwrap_or(LoopPosition::Above);
                options.push(format!("loop {position}"));
                options.push("looseness=20".into());
                &from
            } else {
                if edge.bend != 0.0 {
                    let side = if edge.bend > 0.0 { "right" } else { "left" };
                    options.push(format!("bend {side}={}", edge.bend.abs()));
                }
                &to
            };
            body.push(format!(
                r"\draw [{}] ({from}) to {label} ({target});",
                options.join(",")
            ));
        }
    }

    body.join("\n    ")
}

fn subfigure(diagram: &Diagram, palette: &Palette, colors: &mut ColorTable) -> String {
    let body = diagram_body(diagram, palette, colors);
    let caption = &diagram.options.label;
    let mut safe_label = ascii_alphanumeric(caption);
    if safe_label.is_empty() {
        safe_label = format!("graph{}", diagram.name);
    }
    format!(
        "\\begin{{subfigure}}[t]{{{SUBFIGURE_WIDTH}\\textwidth}}\n    \\centering\n    \\begin{{tikzpicture}}[scale={}]\n        {body}\n    \\end{{tikzpicture}}\n    \\caption{{{caption}}}\n    \\label{{fig:{safe_label}}}\n\\end{{subfigure}}",
        diagram.options.scale
    )
}

/// Complete `figure` environment laying out every diagram as a subfigure.
pub fn generate_grid(graphs: &[Diagram], main_caption: &str, palette: &Palette) -> String {
    if graphs.is_empty() {
        return NO_GRAPHS.to_string();
    }
    let mut colors = ColorTable::default();
    let grid = graphs
        .iter()
        .map(|diagram| subfigure(diagram, palette, &mut colors))
        .collect::<Vec<_>>()
        .join("\n");

    let mut parts: Vec<String> = Vec::new();
    let definitions = colors.definitions();
    if !definitions.is_empty() {
        parts.push("% Custom color definitions".into());
        parts.extend(definitions);
    }
    parts.push("% Reusable TikZ styles".into());
    parts.extend(TIKZ_STYLES.iter().map(|s| s.to_string()));

    parts.push(r"\begin{figure}[H]".into());
    parts.push(r"\centering".into());
    parts.push(grid);
    if !main_caption.is_empty() {
        let mut safe = ascii_alphanumeric(main_caption);
        if safe.is_empty() {
            safe = "graphGrid".into();
        }
        parts.push(format!(r"\caption{{{main_caption}}}"));
        parts.push(format!(r"\label{{fig:{safe}}}"));
    }
    parts.push(r"\end{figure}".into());
    parts.join("\n")
}
