//! Blocking HTTP client for the palette and export services.

use super::{
    ExportRequest, ExportResponse, ExportService, PaletteService, ServiceError, ServiceResult,
};
use crate::config::ServiceConfig;
use crate::palette::Palette;
use crate::storage::BoxFuture;
use std::time::Duration;
use ureq::Agent;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Palette and export services over HTTP.
pub struct HttpServices {
    config: ServiceConfig,
    agent: Agent,
}

impl HttpServices {
    pub fn new(config: ServiceConfig) -> Self {
        // Error replies carry a JSON body we still want to read.
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self { config, agent }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> ServiceResult<Url> {
        self.config
            .endpoint(path)
            .map_err(|e| ServiceError::Url(e.to_string()))
    }

    fn get(&self, path: &str) -> ServiceResult<(u16, String)> {
        let url = self.endpoint(path)?;
        log::debug!("GET {url}");
        let mut response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(transport)?;
        let body = response.body_mut().read_to_string().map_err(transport)?;
        Ok((response.status().as_u16(), body))
    }

    fn post_json(&self, path: &str, body: String) -> ServiceResult<(u16, String)> {
        let url = self.endpoint(path)?;
        log::debug!("POST {url}");
        let mut response = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .send(body)
            .map_err(transport)?;
        let body = response.body_mut().read_to_string().map_err(transport)?;
        Ok((response.status().as_u16(), body))
    }
}

impl Default for HttpServices {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

fn transport(e: ureq::Error) -> ServiceError {
    ServiceError::Transport(e.to_string())
}

fn check_status(status: u16) -> ServiceResult<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ServiceError::Transport(format!("HTTP status {status}")))
    }
}

impl PaletteService for HttpServices {
    fn load_palette(&self) -> BoxFuture<'_, ServiceResult<Palette>> {
        Box::pin(async move {
            let (status, body) = self.get("get_colors")?;
            check_status(status)?;
            serde_json::from_str(&body).map_err(|e| ServiceError::Decode(e.to_string()))
        })
    }

    fn save_palette(&self, palette: &Palette) -> BoxFuture<'_, ServiceResult<()>> {
        let body = serde_json::json!({ "palette": palette }).to_string();
        Box::pin(async move {
            let (status, _) = self.post_json("save_colors", body)?;
            check_status(status)
        })
    }
}

impl ExportService for HttpServices {
    fn export(&self, request: &ExportRequest) -> BoxFuture<'_, ServiceResult<ExportResponse>> {
        let body = serde_json::to_string(request);
        Box::pin(async move {
            let body = body.map_err(|e| ServiceError::Decode(e.to_string()))?;
            let (status, reply) = self.post_json("generate_grid", body)?;
            match serde_json::from_str::<ExportResponse>(&reply) {
                Ok(response) => Ok(response),
                Err(e) => {
                    check_status(status)?;
                    Err(ServiceError::Decode(e.to_string()))
                }
            }
        })
    }
}
