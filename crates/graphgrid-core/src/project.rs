//! Project files: the palette plus every diagram, as one JSON document.

use crate::model::{Diagram, ModelError};
use crate::palette::Palette;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Suggested file name when exporting a project.
pub const DEFAULT_PROJECT_FILE_NAME: &str = "graph_project.json";

/// Project import/export errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectError {
    #[error("Invalid file.")]
    InvalidFile,
    #[error("{0}")]
    Parse(String),
    #[error("Graph {index}: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: ModelError,
    },
    #[error("Project contains no graphs.")]
    NoGraphs,
}

/// Serialized project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub palette: Palette,
    pub graphs: Vec<Diagram>,
}

impl ProjectFile {
    pub fn new(palette: Palette, graphs: Vec<Diagram>) -> Self {
        Self { palette, graphs }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a project document.
    ///
    /// Both `palette` and `graphs` must be present and non-null, every diagram
    /// must satisfy the model invariants and at least one diagram is required.
    pub fn parse(json: &str) -> Result<Self, ProjectError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ProjectError::Parse(e.to_string()))?;
        let has = |key: &str| value.get(key).is_some_and(|v| !v.is_null());
        if !has("palette") || !has("graphs") {
            return Err(ProjectError::InvalidFile);
        }

        // Diagrams saved without options caption themselves with their name.
        let uncaptioned: Vec<usize> = value["graphs"]
            .as_array()
            .map(|graphs| {
                graphs
                    .iter()
                    .enumerate()
                    .filter(|(_, graph)| graph.get("options").is_none())
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_default();

        let mut project: ProjectFile =
            serde_json::from_value(value).map_err(|e| ProjectError::Parse(e.to_string()))?;
        for index in uncaptioned {
            if let Some(diagram) = project.graphs.get_mut(index) {
                diagram.options.label = diagram.name.clone();
            }
        }
        for (index, diagram) in project.graphs.iter().enumerate() {
            diagram
                .validate()
                .map_err(|source| ProjectError::Invalid { index, source })?;
        }
        if project.graphs.is_empty() {
            return Err(ProjectError::NoGraphs);
        }
        Ok(project)
    }
}
