//! GraphGrid Core Library
//!
//! Platform-agnostic scene engine for the GraphGrid diagram editor: diagram
//! model, viewport, hit-testing, snapping, edge geometry and the pointer
//! interaction state machine.

pub mod config;
pub mod edit;
pub mod editor;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod model;
pub mod palette;
pub mod project;
pub mod prompt;
pub mod scene;
pub mod services;
pub mod session;
pub mod snap;
pub mod storage;
pub mod viewport;

pub use config::{EditorConfig, ServiceConfig};
pub use edit::{EditError, EditTarget, Property};
pub use editor::{Editor, EditorAction, InteractionState};
pub use geometry::{EdgeGeometry, EdgePath, GeometryParams};
pub use hit::{ApproxTextMetrics, SpatialQuery, TextMetrics};
pub use input::{InputState, Modifiers, MouseButton, PointerEvent};
pub use model::{
    Connectable, Diagram, Edge, EdgeDirection, EdgeId, EdgeStyle, ElementId, ElementKind,
    ElementRef, LoopPosition, TextNode, Vertex, VertexShape,
};
pub use palette::{Palette, PaletteEntry, Rgb};
pub use project::{ProjectError, ProjectFile};
pub use prompt::{PromptRequest, Prompter, ScriptedPrompter};
pub use scene::{Scene, SceneError};
pub use services::{ExportService, HttpServices, PaletteService};
pub use session::{Notice, NoticeLevel, Session};
pub use snap::{SnapGuides, SnapResult};
pub use storage::{FileStorage, MemoryStorage, ProjectStore, StorageError};
pub use viewport::Viewport;
