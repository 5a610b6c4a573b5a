//! Property edits coming from forms: one scalar field on one element.

use crate::model::{
    Diagram, EdgeDirection, EdgeId, EdgeStyle, ElementId, LoopPosition, VertexShape,
};
use crate::palette::Rgb;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Editable element fields, named by their form keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Label,
    Color,
    Shape,
    Style,
    Direction,
    Bend,
    LoopPosition,
    Text,
}

impl Property {
    pub fn key(&self) -> &'static str {
        match self {
            Property::Label => "label",
            Property::Color => "color",
            Property::Shape => "shape",
            Property::Style => "style",
            Property::Direction => "direction",
            Property::Bend => "bend",
            Property::LoopPosition => "loopPosition",
            Property::Text => "text",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Property {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "label" => Property::Label,
            "color" => Property::Color,
            "shape" => Property::Shape,
            "style" => Property::Style,
            "direction" => Property::Direction,
            "bend" => Property::Bend,
            "loopPosition" => Property::LoopPosition,
            "text" => Property::Text,
            other => return Err(EditError::UnknownProperty(other.to_string())),
        })
    }
}

/// Element an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditTarget {
    Vertex(ElementId),
    Edge(EdgeId),
    TextNode(ElementId),
}

impl fmt::Display for EditTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditTarget::Vertex(id) => write!(f, "vertex {id}"),
            EditTarget::Edge(id) => write!(f, "edge {id}"),
            EditTarget::TextNode(id) => write!(f, "text node {id}"),
        }
    }
}

/// Rejected property edit. The diagram is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Unknown property {0:?}")]
    UnknownProperty(String),
    #[error("No {0}")]
    NotFound(EditTarget),
    #[error("{target} has no property {property}")]
    Unsupported { target: EditTarget, property: Property },
    #[error("Invalid {property} value {value:?}")]
    InvalidValue { property: Property, value: String },
}

/// Parse the leading integer of a form value; anything unparsable is 0.
///
/// Leading whitespace and a sign are accepted, parsing stops at the first
/// non-digit: `"12px"` is 12, `"-7.5"` is -7, `"abc"` and `""` are 0.
pub fn parse_leading_int(value: &str) -> i64 {
    let s = value.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add((b - b'0') as i64));
    if negative { -magnitude } else { magnitude }
}

fn parse_color(value: &str) -> Result<Option<Rgb>, EditError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<Rgb>()
        .map(Some)
        .map_err(|_| EditError::InvalidValue {
            property: Property::Color,
            value: value.to_string(),
        })
}

fn parse_keyword<T: FromStr>(property: Property, value: &str) -> Result<T, EditError> {
    value.parse::<T>().map_err(|_| EditError::InvalidValue {
        property,
        value: value.to_string(),
    })
}

/// Assign one field of one element in `diagram`.
pub fn apply_edit(
    diagram: &mut Diagram,
    target: EditTarget,
    property: Property,
    value: &str,
) -> Result<(), EditError> {
    let unsupported = || EditError::Unsupported { target, property };
    match target {
        EditTarget::Vertex(id) => {
            let vertex = diagram.vertex_mut(id).ok_or(EditError::NotFound(target))?;
            match property {
                Property::Label => vertex.label = value.to_string(),
                Property::Color => vertex.color = parse_color(value)?,
                Property::Shape => vertex.shape = parse_keyword::<VertexShape>(property, value)?,
                _ => return Err(unsupported()),
            }
        }
        EditTarget::TextNode(id) => {
            let node = diagram.text_node_mut(id).ok_or(EditError::NotFound(target))?;
            match property {
                Property::Text => node.text = value.to_string(),
                Property::Color => node.color = parse_color(value)?,
                _ => return Err(unsupported()),
            }
        }
        EditTarget::Edge(id) => {
            let edge = diagram.edge_mut(id).ok_or(EditError::NotFound(target))?;
            match property {
                Property::Label => edge.label = value.to_string(),
                Property::Color => edge.color = parse_color(value)?,
                Property::Style => edge.style = parse_keyword::<EdgeStyle>(property, value)?,
                Property::Direction => {
                    edge.direction = parse_keyword::<EdgeDirection>(property, value)?
                }
                Property::Bend if !edge.is_loop() => edge.bend = parse_leading_int(value) as f64,
                Property::LoopPosition if edge.is_loop() => {
                    edge.loop_position = Some(parse_keyword::<LoopPosition>(property, value)?)
                }
                _ => return Err(unsupported()),
            }
        }
    }
    log::debug!("set {property} of {target} in {:?}", diagram.name);
    Ok(())
}

/// Delete an element. Vertices and text nodes cascade to their edges.
pub fn delete_target(diagram: &mut Diagram, target: EditTarget) -> Result<(), EditError> {
    let found = match target {
        EditTarget::Vertex(id) => diagram.vertex(id).is_some() && diagram.delete_connectable(id).is_some(),
        EditTarget::TextNode(id) => {
            diagram.text_node(id).is_some() && diagram.delete_connectable(id).is_some()
        }
        EditTarget::Edge(id) => diagram.delete_edge(id),
    };
    if found { Ok(()) } else { Err(EditError::NotFound(target)) }
}
