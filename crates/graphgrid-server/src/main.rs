//! GraphGrid Service
//!
//! Stores the shared color palette and turns diagrams into LaTeX/TikZ.
//!
//! ## Routes
//!
//! - `GET /get_colors` returns the palette as `[{ "name": .., "rgb": "r,g,b" }]`
//! - `POST /save_colors` takes `{ "palette": [..] }` and replies `{ "status": "success" }`
//! - `POST /generate_grid` takes `{ "graphs": [..], "main_caption": .. }` and replies
//!   `{ "tikz_code": .. }` or `{ "error": .. }`
//! - `GET /health`

mod palette_store;
mod tikz;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use graphgrid_core::palette::Palette;
use graphgrid_core::services::{ExportRequest, ExportResponse};
use palette_store::{PaletteStore, PaletteStoreError};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Server configuration, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ServerConfig {
    host: String,
    port: u16,
    palette_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            palette_path: PathBuf::from("colors.json"),
        }
    }
}

impl ServerConfig {
    fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = match lookup("GRAPHGRID_PORT") {
            Some(value) => value.parse().unwrap_or_else(|_| {
                warn!("ignoring invalid GRAPHGRID_PORT {value:?}");
                defaults.port
            }),
            None => defaults.port,
        };
        Self {
            host: lookup("GRAPHGRID_HOST").unwrap_or(defaults.host),
            port,
            palette_path: lookup("GRAPHGRID_PALETTE")
                .map(PathBuf::from)
                .unwrap_or(defaults.palette_path),
        }
    }
}

/// Shared application state
struct AppState {
    palette: PaletteStore,
}

/// Failures reported to clients as `{ "error": .. }`.
#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error(transparent)]
    Palette(#[from] PaletteStoreError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Palette(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        warn!("request failed: {self}");
        let body = ExportResponse::Error {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct SaveColorsRequest {
    #[serde(default)]
    palette: Palette,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct StatusReply {
    status: &'static str,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graphgrid_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();
    let state = Arc::new(AppState {
        palette: PaletteStore::open(&config.palette_path).await?,
    });

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("GraphGrid service listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get_colors", get(get_colors))
        .route("/save_colors", post(save_colors))
        .route("/generate_grid", post(generate_grid))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

async fn get_colors(State(state): State<Arc<AppState>>) -> Json<Palette> {
    Json(state.palette.get().await)
}

async fn save_colors(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveColorsRequest>,
) -> Result<Json<StatusReply>, ApiError> {
    state.palette.save(request.palette).await?;
    Ok(Json(StatusReply { status: "success" }))
}

async fn generate_grid(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ExportResponse>, ApiError> {
    let request: ExportRequest =
        serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let palette = state.palette.get().await;
    info!("generating TikZ for {} graphs", request.graphs.len());
    let tikz_code = tikz::generate_grid(&request.graphs, &request.main_caption, &palette);
    Ok(Json(ExportResponse::Code { tikz_code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphgrid_core::palette::{PaletteEntry, Rgb};
    use tempfile::TempDir;

    async fn state(dir: &TempDir) -> Arc<AppState> {
        Arc::new(AppState {
            palette: PaletteStore::open(dir.path().join("colors.json")).await.unwrap(),
        })
    }

    #[test]
    fn test_config_from_lookup() {
        let config = ServerConfig::from_lookup(|key| match key {
            "GRAPHGRID_PORT" => Some("8080".into()),
            "GRAPHGRID_PALETTE" => Some("/tmp/p.json".into()),
            _ => None,
        });
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.palette_path, PathBuf::from("/tmp/p.json"));

        let config = ServerConfig::from_lookup(|key| (key == "GRAPHGRID_PORT").then(|| "nope".into()));
        assert_eq!(config, ServerConfig::default());
    }

    #[tokio::test]
    async fn test_get_and_save_colors() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;
        let Json(palette) = get_colors(State(state.clone())).await;
        assert_eq!(palette, palette_store::default_palette());

        let custom = Palette::new(vec![PaletteEntry::new("Ink", Rgb::new(9, 9, 9))]);
        let reply = save_colors(
            State(state.clone()),
            Json(SaveColorsRequest {
                palette: custom.clone(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(reply.0, StatusReply { status: "success" });
        assert_eq!(get_colors(State(state)).await.0, custom);
    }

    #[tokio::test]
    async fn test_generate_grid() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;

        let empty = generate_grid(State(state.clone()), Json(serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(
            empty.0,
            ExportResponse::Code {
                tikz_code: tikz::NO_GRAPHS.into()
            }
        );

        let body = serde_json::json!({
            "graphs": [{
                "name": "Graph 1",
                "vertices": [{"id": 1, "x": 40, "y": 40, "color": "147,197,253"}],
                "edges": [],
                "textNodes": [],
                "options": {"label": "Demo", "scale": 0.8}
            }],
            "main_caption": ""
        });
        let Json(reply) = generate_grid(State(state.clone()), Json(body)).await.unwrap();
        let ExportResponse::Code { tikz_code } = reply else {
            panic!("expected code");
        };
        assert!(tikz_code.contains(r"\definecolor{NodeBlue}{RGB}{147,197,253}"));
        assert!(tikz_code.contains(r"\begin{tikzpicture}[scale=0.8]"));
    }

    #[tokio::test]
    async fn test_generate_grid_accepts_default_colors() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;
        let body = serde_json::json!({
            "graphs": [{
                "name": "Graph 1",
                "vertices": [
                    {"id": 1, "x": 0, "y": 0, "label": "", "color": "", "shape": "circle"},
                    {"id": 2, "x": 80, "y": 0, "label": "", "color": null, "shape": "circle"}
                ],
                "edges": [{"id": 1, "from": 1, "to": 2, "color": "", "bend": "10"}],
                "textNodes": [{"id": 3, "text": "t", "x": 40, "y": 40, "color": ""}],
                "options": {"label": "Graph 1", "scale": 0.5}
            }],
            "main_caption": ""
        });
        let Json(reply) = generate_grid(State(state), Json(body)).await.unwrap();
        let ExportResponse::Code { tikz_code } = reply else {
            panic!("expected code");
        };
        assert!(!tikz_code.contains(r"\definecolor"));
        assert!(tikz_code.contains("bend right=10"));
    }

    #[tokio::test]
    async fn test_generate_grid_rejects_malformed_graphs() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir).await;
        let body = serde_json::json!({ "graphs": [{ "vertices": "nope" }] });
        let error = generate_grid(State(state), Json(body)).await.unwrap_err();
        assert!(matches!(error, ApiError::BadRequest(_)));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_router_builds() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let state = runtime.block_on(state(&dir));
        let _router = router(state);
    }
}
