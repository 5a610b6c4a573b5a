//! Session: the editor plus everything around it that talks to the user or the network.

use crate::edit::{EditError, EditTarget, Property};
use crate::editor::Editor;
use crate::palette::Palette;
use crate::project::{ProjectError, ProjectFile};
use crate::prompt::{self, PromptRequest, Prompter};
use crate::scene::SceneError;
use crate::services::{ExportRequest, ExportService, PaletteService};
use crate::storage::{ProjectStore, StorageError};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Editor session with queued notices and the last export output.
pub struct Session {
    editor: Editor,
    notices: Vec<Notice>,
    main_caption: String,
    output: String,
}

impl Session {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor,
            notices: Vec::new(),
            main_caption: String::new(),
            output: String::new(),
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn palette(&self) -> &Palette {
        &self.editor.scene().palette
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Take every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => log::info!("{}", notice.message),
            NoticeLevel::Error => log::warn!("{}", notice.message),
        }
        self.notices.push(notice);
    }

    pub fn main_caption(&self) -> &str {
        &self.main_caption
    }

    pub fn set_main_caption(&mut self, caption: impl Into<String>) {
        self.main_caption = caption.into();
    }

    /// Text of the last export.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Fetch the shared palette. On failure the palette is left empty.
    pub async fn init(&mut self, service: &dyn PaletteService) {
        match service.load_palette().await {
            Ok(palette) => {
                log::info!("loaded palette with {} colors", palette.len());
                self.editor.scene_mut().palette = palette;
            }
            Err(e) => {
                log::warn!("palette load failed: {e}");
                self.editor.scene_mut().palette = Palette::default();
                self.notify(Notice::error("Error loading palette"));
            }
        }
    }

    /// Add a palette color. Invalid input is reported and changes nothing.
    pub fn add_color(&mut self, name: &str, rgb: &str) -> bool {
        match self.editor.scene_mut().palette.add_color(name, rgb) {
            Ok(()) => true,
            Err(e) => {
                self.notify(Notice::error(e.to_string()));
                false
            }
        }
    }

    pub fn remove_color(&mut self, index: usize) -> bool {
        match self.editor.scene_mut().palette.remove(index) {
            Ok(entry) => {
                log::debug!("removed palette color {:?}", entry.name);
                true
            }
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    pub async fn save_palette(&mut self, service: &dyn PaletteService) -> bool {
        let palette = self.editor.scene().palette.clone();
        match service.save_palette(&palette).await {
            Ok(()) => {
                self.notify(Notice::success("Palette saved!"));
                true
            }
            Err(e) => {
                log::warn!("palette save failed: {e}");
                self.notify(Notice::error("Error saving the palette."));
                false
            }
        }
    }

    /// Export every diagram and store the reply as the output text.
    pub async fn generate_export(&mut self, service: &dyn ExportService) -> &str {
        let request = ExportRequest {
            graphs: self.editor.scene().diagrams().to_vec(),
            main_caption: self.main_caption.clone(),
        };
        self.output = match service.export(&request).await {
            Ok(response) => response.display_text(),
            Err(e) => {
                log::warn!("export failed: {e}");
                format!("Connection ERROR: {e}")
            }
        };
        &self.output
    }

    /// Serialize the palette and every diagram as a project document.
    pub fn export_project(&mut self) -> Result<String, serde_json::Error> {
        let json = self.editor.scene().to_project().to_json()?;
        self.notify(Notice::success("Project saved."));
        Ok(json)
    }

    /// Replace the scene with an imported project. Rejected input changes nothing.
    pub fn import_project(&mut self, json: &str) -> Result<(), ProjectError> {
        match ProjectFile::parse(json) {
            Ok(project) => {
                self.load(project);
                Ok(())
            }
            Err(e) => {
                self.notify(Notice::error(format!("Load error: {e}")));
                Err(e)
            }
        }
    }

    fn load(&mut self, project: ProjectFile) {
        self.editor.cancel_gesture();
        if self.editor.scene_mut().replace_from(project) {
            self.notify(Notice::success("Project loaded successfully!"));
        }
    }

    /// Write the project document to `store`.
    pub async fn save_to(&mut self, store: &dyn ProjectStore) -> Result<(), StorageError> {
        let result = match self.editor.scene().to_project().to_json() {
            Ok(json) => store.write(json).await,
            Err(e) => Err(e.into()),
        };
        match &result {
            Ok(()) => self.notify(Notice::success("Project saved.")),
            Err(e) => self.notify(Notice::error(format!("Save error: {e}"))),
        }
        result
    }

    /// Import the document held by `store`, with the same validation as [`Self::import_project`].
    pub async fn load_from(&mut self, store: &dyn ProjectStore) -> Result<(), StorageError> {
        let json = match store.read().await {
            Ok(json) => json,
            Err(e) => {
                self.notify(Notice::error(format!("Load error: {e}")));
                return Err(e);
            }
        };
        self.import_project(&json)?;
        Ok(())
    }

    /// Delete a diagram after confirmation. Returns whether it was deleted.
    pub async fn delete_diagram(&mut self, index: usize, prompter: &dyn Prompter) -> bool {
        let name = match self.editor.scene().diagrams().get(index) {
            Some(diagram) => diagram.name.clone(),
            None => return false,
        };
        if self.editor.scene().diagrams().len() <= 1 {
            self.notify(Notice::error(SceneError::LastDiagram.to_string()));
            return false;
        }
        let message = format!("Are you sure you want to delete \"{name}\"?");
        if !prompt::confirm(prompter, message).await {
            return false;
        }
        match self.editor.delete_diagram(index) {
            Ok(()) => true,
            Err(e) => {
                self.notify(Notice::error(e.to_string()));
                false
            }
        }
    }

    /// Empty the active diagram after confirmation.
    pub async fn clear_active(&mut self, prompter: &dyn Prompter) -> bool {
        if !prompt::confirm(prompter, "Are you sure you want to clear the active graph?").await {
            return false;
        }
        self.editor.cancel_gesture();
        self.editor.scene_mut().clear_active();
        true
    }

    /// Ask for a new diagram name. Dismissed or blank answers keep the old name.
    pub async fn rename_diagram(&mut self, index: usize, prompter: &dyn Prompter) -> bool {
        let current = match self.editor.scene().diagrams().get(index) {
            Some(diagram) => diagram.name.clone(),
            None => return false,
        };
        let Some(name) = prompter.prompt(&PromptRequest::RenameDiagram { current }).await else {
            return false;
        };
        self.editor
            .scene_mut()
            .rename_diagram(index, &name)
            .unwrap_or(false)
    }

    /// Apply a form edit given by its property key.
    pub fn set_property(&mut self, target: EditTarget, key: &str, value: &str) -> Result<(), EditError> {
        let property: Property = key.parse()?;
        self.editor
            .scene_mut()
            .set_property(target, property, value)
            .inspect_err(|e| log::warn!("rejected edit: {e}"))
    }

    pub fn delete_element(&mut self, target: EditTarget) -> Result<(), EditError> {
        self.editor.cancel_gesture();
        self.editor.scene_mut().delete_element(target)
    }
}
