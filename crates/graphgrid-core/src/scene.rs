//! The scene: every diagram, the active one, and the shared palette.

use crate::edit::{self, EditError, EditTarget, Property};
use crate::model::Diagram;
use crate::palette::Palette;
use crate::project::ProjectFile;
use thiserror::Error;

/// Rejected diagram-tab operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("Cannot delete the last graph.")]
    LastDiagram,
    #[error("No graph at index {0}")]
    OutOfRange(usize),
}

/// Ordered diagrams with exactly one active, plus the palette.
///
/// Always holds at least one diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    diagrams: Vec<Diagram>,
    active: usize,
    pub palette: Palette,
    dirty: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

impl Scene {
    /// A scene with a single empty "Graph 1".
    pub fn new(palette: Palette) -> Self {
        Self {
            diagrams: vec![Diagram::new("Graph 1")],
            active: 0,
            palette,
            dirty: false,
        }
    }

    pub fn diagrams(&self) -> &[Diagram] {
        &self.diagrams
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Diagram {
        &self.diagrams[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Diagram {
        &mut self.diagrams[self.active]
    }

    /// Whether the model changed since the last `take_dirty`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Read and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Name for a new diagram: `"Graph N"`, one past the largest existing number.
    pub fn next_diagram_name(&self) -> String {
        let max = self
            .diagrams
            .iter()
            .map(|d| {
                d.name
                    .split(' ')
                    .nth(1)
                    .map(edit::parse_leading_int)
                    .unwrap_or(0)
            })
            .fold(0, i64::max);
        format!("Graph {}", max + 1)
    }

    /// Append a new empty diagram and make it active. Returns its index.
    pub fn add_diagram(&mut self) -> usize {
        let name = self.next_diagram_name();
        log::info!("adding diagram {name:?}");
        self.diagrams.push(Diagram::new(name));
        self.active = self.diagrams.len() - 1;
        self.dirty = true;
        self.active
    }

    /// Remove a diagram, keeping the active index in range.
    pub fn delete_diagram(&mut self, index: usize) -> Result<Diagram, SceneError> {
        if index >= self.diagrams.len() {
            return Err(SceneError::OutOfRange(index));
        }
        if self.diagrams.len() <= 1 {
            return Err(SceneError::LastDiagram);
        }
        let removed = self.diagrams.remove(index);
        if self.active >= self.diagrams.len() {
            self.active = self.diagrams.len() - 1;
        }
        log::info!("deleted diagram {:?}", removed.name);
        self.dirty = true;
        Ok(removed)
    }

    pub fn switch_diagram(&mut self, index: usize) -> Result<(), SceneError> {
        if index >= self.diagrams.len() {
            return Err(SceneError::OutOfRange(index));
        }
        if index != self.active {
            self.active = index;
            self.dirty = true;
        }
        Ok(())
    }

    /// Rename a diagram and its caption. Blank names are ignored.
    ///
    /// Returns whether the diagram was renamed.
    pub fn rename_diagram(&mut self, index: usize, name: &str) -> Result<bool, SceneError> {
        let diagram = self
            .diagrams
            .get_mut(index)
            .ok_or(SceneError::OutOfRange(index))?;
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        diagram.name = name.to_string();
        diagram.options.label = name.to_string();
        self.dirty = true;
        Ok(true)
    }

    /// Remove all content from the active diagram.
    pub fn clear_active(&mut self) {
        self.active_mut().clear();
        self.dirty = true;
    }

    /// Set the caption of the active diagram.
    pub fn set_caption(&mut self, label: impl Into<String>) {
        self.active_mut().options.label = label.into();
        self.dirty = true;
    }

    /// Set the export scale of the active diagram.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.active_mut().options.scale = scale;
            self.dirty = true;
        }
    }

    /// Assign one element property in the active diagram.
    pub fn set_property(
        &mut self,
        target: EditTarget,
        property: Property,
        value: &str,
    ) -> Result<(), EditError> {
        edit::apply_edit(self.active_mut(), target, property, value)?;
        self.dirty = true;
        Ok(())
    }

    /// Delete an element of the active diagram.
    pub fn delete_element(&mut self, target: EditTarget) -> Result<(), EditError> {
        edit::delete_target(self.active_mut(), target)?;
        self.dirty = true;
        Ok(())
    }

    /// Snapshot for export.
    pub fn to_project(&self) -> ProjectFile {
        ProjectFile::new(self.palette.clone(), self.diagrams.clone())
    }

    /// Replace palette and diagrams with a validated project and activate the first diagram.
    ///
    /// An empty project leaves the scene untouched.
    pub fn replace_from(&mut self, project: ProjectFile) -> bool {
        if project.graphs.is_empty() {
            return false;
        }
        self.palette = project.palette;
        self.diagrams = project.graphs;
        self.active = 0;
        self.dirty = true;
        true
    }
}
