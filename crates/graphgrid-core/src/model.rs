//! Diagram data model: vertices, text nodes, edges and the invariants tying them together.

use crate::palette::Rgb;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a vertex or text node. Unique across both kinds within a diagram.
pub type ElementId = u32;

/// Identifier of an edge. Unique among the edges of a diagram.
pub type EdgeId = u32;

/// Scale applied to new diagrams.
pub const DEFAULT_DIAGRAM_SCALE: f64 = 0.5;

/// Model invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Duplicate element id {0}")]
    DuplicateElementId(ElementId),
    #[error("Duplicate edge id {0}")]
    DuplicateEdgeId(EdgeId),
    #[error("Edge {edge} references missing element {endpoint}")]
    DanglingEdge { edge: EdgeId, endpoint: ElementId },
    #[error("No element with id {0}")]
    MissingElement(ElementId),
}

/// Error for unrecognized keyword values (shape, style, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} {value:?}")]
pub struct KeywordError {
    pub kind: &'static str,
    pub value: String,
}

/// Implements `FromStr` and `Display` for a keyword enum using its serde names.
macro_rules! keyword_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = KeywordError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(KeywordError { kind: $kind, value: other.to_string() }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Outline of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexShape {
    #[default]
    Circle,
    Square,
    /// Stored as `"triangle"` in project files.
    #[serde(rename = "triangle")]
    Hexagon,
}

keyword_enum!(VertexShape, "shape", {
    Circle => "circle",
    Square => "square",
    Hexagon => "triangle",
});

/// Stroke pattern of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

keyword_enum!(EdgeStyle, "style", {
    Solid => "solid",
    Dashed => "dashed",
    Dotted => "dotted",
});

/// Which end of an edge carries an arrowhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeDirection {
    #[default]
    #[serde(rename = "none")]
    Undirected,
    /// Arrowhead at `to`.
    #[serde(rename = "to")]
    Forward,
    /// Arrowhead at `from`.
    #[serde(rename = "from")]
    Backward,
}

keyword_enum!(EdgeDirection, "direction", {
    Undirected => "none",
    Forward => "to",
    Backward => "from",
});

/// Side of a vertex on which a self-loop is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopPosition {
    #[default]
    Above,
    Below,
    Left,
    Right,
}

keyword_enum!(LoopPosition, "loop position", {
    Above => "above",
    Below => "below",
    Left => "left",
    Right => "right",
});

impl LoopPosition {
    /// Direction of the loop center from the vertex, in radians (screen space, y down).
    pub fn angle(&self) -> f64 {
        use std::f64::consts::{FRAC_PI_2, PI};
        match self {
            LoopPosition::Above => -FRAC_PI_2,
            LoopPosition::Below => FRAC_PI_2,
            LoopPosition::Left => PI,
            LoopPosition::Right => 0.0,
        }
    }
}

/// A graph vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "compat::color")]
    pub color: Option<Rgb>,
    #[serde(default)]
    pub shape: VertexShape,
}

impl Vertex {
    pub fn new(id: ElementId, position: Point) -> Self {
        Self {
            id,
            x: position.x,
            y: position.y,
            label: String::new(),
            color: None,
            shape: VertexShape::Circle,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Text shown inside the vertex: the label, or `v{id}` when empty.
    pub fn display_label(&self) -> String {
        if self.label.is_empty() {
            format!("v{}", self.id)
        } else {
            self.label.clone()
        }
    }
}

/// Free-floating text that can also serve as an edge endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "compat::color")]
    pub color: Option<Rgb>,
}

impl TextNode {
    pub fn new(id: ElementId, position: Point, text: impl Into<String>) -> Self {
        Self {
            id,
            x: position.x,
            y: position.y,
            text: text.into(),
            color: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A connection between two connectable elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: ElementId,
    pub to: ElementId,
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "compat::color")]
    pub color: Option<Rgb>,
    #[serde(default)]
    pub style: EdgeStyle,
    #[serde(default)]
    pub direction: EdgeDirection,
    /// Perpendicular displacement of the control point. Ignored for self-loops.
    #[serde(default, deserialize_with = "compat::bend")]
    pub bend: f64,
    /// Loop side. Only meaningful when `from == to`.
    #[serde(
        default,
        rename = "loopPosition",
        skip_serializing_if = "Option::is_none"
    )]
    pub loop_position: Option<LoopPosition>,
}

impl Edge {
    pub fn new(id: EdgeId, from: ElementId, to: ElementId) -> Self {
        Self {
            id,
            from,
            to,
            label: String::new(),
            color: None,
            style: EdgeStyle::Solid,
            direction: EdgeDirection::Undirected,
            bend: 0.0,
            loop_position: (from == to).then_some(LoopPosition::Above),
        }
    }

    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }

    pub fn touches(&self, id: ElementId) -> bool {
        self.from == id || self.to == id
    }
}

/// Lenient readers for fields that browser-written files store loosely.
mod compat {
    use crate::edit::parse_leading_int;
    use crate::palette::Rgb;
    use serde::{Deserialize, Deserializer};

    /// `""` and `null` both mean "default color".
    pub fn color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Rgb>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.trim().is_empty() => s.parse().map(Some).map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawBend {
        Number(f64),
        Text(String),
    }

    /// Numbers pass through; strings follow form-input integer parsing; `null` is 0.
    pub fn bend<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(match Option::<RawBend>::deserialize(deserializer)? {
            Some(RawBend::Number(n)) => n,
            Some(RawBend::Text(s)) => parse_leading_int(&s) as f64,
            None => 0.0,
        })
    }
}

/// Kind of connectable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Vertex,
    TextNode,
}

/// Lightweight reference to a connectable element of a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub kind: ElementKind,
    pub id: ElementId,
}

impl ElementRef {
    pub fn vertex(id: ElementId) -> Self {
        Self {
            kind: ElementKind::Vertex,
            id,
        }
    }

    pub fn text_node(id: ElementId) -> Self {
        Self {
            kind: ElementKind::TextNode,
            id,
        }
    }
}

/// A vertex or a text node, treated uniformly for hit-testing and edge endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Connectable<'a> {
    Vertex(&'a Vertex),
    Text(&'a TextNode),
}

impl Connectable<'_> {
    pub fn id(&self) -> ElementId {
        match self {
            Connectable::Vertex(v) => v.id,
            Connectable::Text(t) => t.id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Connectable::Vertex(_) => ElementKind::Vertex,
            Connectable::Text(_) => ElementKind::TextNode,
        }
    }

    pub fn element_ref(&self) -> ElementRef {
        ElementRef {
            kind: self.kind(),
            id: self.id(),
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Connectable::Vertex(v) => v.position(),
            Connectable::Text(t) => t.position(),
        }
    }

    /// Radius used for arrowhead backoff: the vertex radius, zero for text.
    pub fn radius(&self, vertex_radius: f64) -> f64 {
        match self {
            Connectable::Vertex(_) => vertex_radius,
            Connectable::Text(_) => 0.0,
        }
    }
}

/// Per-diagram display options used by the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramOptions {
    /// Caption of the diagram.
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    DEFAULT_DIAGRAM_SCALE
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            label: String::new(),
            scale: DEFAULT_DIAGRAM_SCALE,
        }
    }
}

/// One independently editable graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub name: String,
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default, rename = "textNodes")]
    pub text_nodes: Vec<TextNode>,
    #[serde(default)]
    pub options: DiagramOptions,
}

impl Diagram {
    /// Create an empty diagram whose caption matches its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            options: DiagramOptions {
                label: name.clone(),
                scale: DEFAULT_DIAGRAM_SCALE,
            },
            name,
            vertices: Vec::new(),
            edges: Vec::new(),
            text_nodes: Vec::new(),
        }
    }

    /// Next free vertex/text id: one more than the largest existing id, or 1.
    pub fn next_id(&self) -> ElementId {
        let max_vertex = self.vertices.iter().map(|v| v.id).max().unwrap_or(0);
        let max_text = self.text_nodes.iter().map(|t| t.id).max().unwrap_or(0);
        max_vertex.max(max_text) + 1
    }

    /// Next free edge id: one more than the largest edge id, or 1.
    pub fn next_edge_id(&self) -> EdgeId {
        self.edges.iter().map(|e| e.id).max().unwrap_or(0) + 1
    }

    /// Add a default vertex (circle, empty label, no color) and return its id.
    pub fn add_vertex(&mut self, position: Point) -> ElementId {
        let id = self.next_id();
        self.vertices.push(Vertex::new(id, position));
        log::debug!("diagram {:?}: added vertex {id}", self.name);
        id
    }

    /// Add a text node and return its id.
    pub fn add_text_node(&mut self, position: Point, text: impl Into<String>) -> ElementId {
        let id = self.next_id();
        self.text_nodes.push(TextNode::new(id, position, text));
        log::debug!("diagram {:?}: added text node {id}", self.name);
        id
    }

    /// Add an edge between two existing connectable elements.
    ///
    /// A self-loop is created when `from == to`.
    pub fn add_edge(&mut self, from: ElementId, to: ElementId) -> Result<EdgeId, ModelError> {
        for endpoint in [from, to] {
            if self.connectable(endpoint).is_none() {
                return Err(ModelError::MissingElement(endpoint));
            }
        }
        let id = self.next_edge_id();
        self.edges.push(Edge::new(id, from, to));
        log::debug!("diagram {:?}: added edge {id} ({from} -> {to})", self.name);
        Ok(id)
    }

    /// Delete a vertex or text node together with every edge touching it.
    ///
    /// Returns the number of edges removed, or `None` if no element had that id.
    pub fn delete_connectable(&mut self, id: ElementId) -> Option<usize> {
        self.connectable(id)?;
        self.vertices.retain(|v| v.id != id);
        self.text_nodes.retain(|t| t.id != id);
        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(id));
        let removed = before - self.edges.len();
        log::debug!(
            "diagram {:?}: deleted element {id} and {removed} edge(s)",
            self.name
        );
        Some(removed)
    }

    /// Delete a single edge. Returns whether it existed.
    pub fn delete_edge(&mut self, id: EdgeId) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        before != self.edges.len()
    }

    /// Remove every element and edge, keeping name and options.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.text_nodes.clear();
    }

    /// Look up a connectable element by id (vertices first).
    pub fn connectable(&self, id: ElementId) -> Option<Connectable<'_>> {
        self.vertex(id)
            .map(Connectable::Vertex)
            .or_else(|| self.text_node(id).map(Connectable::Text))
    }

    /// Resolve a typed element reference.
    pub fn resolve(&self, element: ElementRef) -> Option<Connectable<'_>> {
        match element.kind {
            ElementKind::Vertex => self.vertex(element.id).map(Connectable::Vertex),
            ElementKind::TextNode => self.text_node(element.id).map(Connectable::Text),
        }
    }

    /// All connectable elements: vertices, then text nodes.
    pub fn connectables(&self) -> impl Iterator<Item = Connectable<'_>> {
        self.vertices
            .iter()
            .map(Connectable::Vertex)
            .chain(self.text_nodes.iter().map(Connectable::Text))
    }

    pub fn vertex(&self, id: ElementId) -> Option<&Vertex> {
        self.vertices.iter().find(|v| v.id == id)
    }

    pub fn vertex_mut(&mut self, id: ElementId) -> Option<&mut Vertex> {
        self.vertices.iter_mut().find(|v| v.id == id)
    }

    pub fn text_node(&self, id: ElementId) -> Option<&TextNode> {
        self.text_nodes.iter().find(|t| t.id == id)
    }

    pub fn text_node_mut(&mut self, id: ElementId) -> Option<&mut TextNode> {
        self.text_nodes.iter_mut().find(|t| t.id == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.id == id)
    }

    /// Move a connectable element. Returns false if it no longer exists.
    pub fn set_position(&mut self, element: ElementRef, position: Point) -> bool {
        let slot = match element.kind {
            ElementKind::Vertex => self.vertex_mut(element.id).map(|v| (&mut v.x, &mut v.y)),
            ElementKind::TextNode => self.text_node_mut(element.id).map(|t| (&mut t.x, &mut t.y)),
        };
        match slot {
            Some((x, y)) => {
                *x = position.x;
                *y = position.y;
                true
            }
            None => false,
        }
    }

    /// Check id uniqueness and that every edge endpoint exists.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut ids = HashSet::new();
        for id in self.connectables().map(|c| c.id()) {
            if !ids.insert(id) {
                return Err(ModelError::DuplicateElementId(id));
            }
        }
        let mut edge_ids = HashSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(edge.id) {
                return Err(ModelError::DuplicateEdgeId(edge.id));
            }
            for endpoint in [edge.from, edge.to] {
                if !ids.contains(&endpoint) {
                    return Err(ModelError::DanglingEdge {
                        edge: edge.id,
                        endpoint,
                    });
                }
            }
        }
        Ok(())
    }
}
