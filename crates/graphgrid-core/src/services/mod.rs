//! Remote palette and export services.

mod http;

pub use http::HttpServices;

use crate::model::Diagram;
use crate::palette::Palette;
use crate::storage::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Service call failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Invalid service URL: {0}")]
    Url(String),
    #[error("{0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Result type for service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Body of an export request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub graphs: Vec<Diagram>,
    #[serde(default)]
    pub main_caption: String,
}

/// Export reply: generated code or an error message from the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportResponse {
    Code { tikz_code: String },
    Error { error: String },
}

impl ExportResponse {
    /// Text shown to the user for this reply.
    pub fn display_text(&self) -> String {
        match self {
            ExportResponse::Code { tikz_code } => tikz_code.clone(),
            ExportResponse::Error { error } => format!("ERROR: {error}"),
        }
    }
}

/// Shared color palette persistence.
pub trait PaletteService {
    fn load_palette(&self) -> BoxFuture<'_, ServiceResult<Palette>>;

    fn save_palette(&self, palette: &Palette) -> BoxFuture<'_, ServiceResult<()>>;
}

/// Diagram export to TikZ.
pub trait ExportService {
    fn export(&self, request: &ExportRequest) -> BoxFuture<'_, ServiceResult<ExportResponse>>;
}
