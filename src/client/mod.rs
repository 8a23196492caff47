//! Reqwest-based client for the visualization service HTTP contract.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

const API_PREFIX: &str = "/api/v1";
const GENERATE_ENDPOINT: &str = "/generate-visualization";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    R,
}

impl Language {
    pub fn label(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::R => "R",
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            Language::Python => Language::R,
            Language::R => Language::Python,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationKind {
    Static,
    Interactive,
}

impl VisualizationKind {
    pub fn label(&self) -> &'static str {
        match self {
            VisualizationKind::Static => "static",
            VisualizationKind::Interactive => "interactive",
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            VisualizationKind::Static => VisualizationKind::Interactive,
            VisualizationKind::Interactive => VisualizationKind::Static,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VisualizationRequest {
    pub code: String,
    pub language: Language,
    pub visualization_type: VisualizationKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisualizationResponse {
    pub status: String,
    pub output_url: Option<String>,
    pub logs: Option<String>,
    pub error: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
    #[serde(default)]
    pub services: std::collections::BTreeMap<String, bool>,
    pub environment: Option<String>,
}

/// What the service produced on a fully successful generation.
#[derive(Debug, Clone)]
pub struct GenerationArtifact {
    pub output_url: String,
    pub logs: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Failure taxonomy for one generation attempt. Display strings are the
/// user-visible messages; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("Please enter some code")]
    EmptyInput,
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Server(String),
    #[error("{0}")]
    Generation(String),
}

#[derive(Debug, Clone)]
pub struct VizClient {
    http: reqwest::Client,
    base_url: String,
}

impl VizClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        // Cookie jar carries ambient session credentials, matching the
        // browser client's credentialed requests.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs()))
            .cookie_store(true)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            http,
            base_url: cfg.backend_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one generation request. Every failure mode collapses into a
    /// `GenerateError`; the caller only needs the display string.
    pub async fn generate(
        &self,
        request: &VisualizationRequest,
    ) -> Result<GenerationArtifact, GenerateError> {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, GENERATE_ENDPOINT);

        let resp = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(interpret_failure(status, &body));
        }
        interpret_success(&body)
    }

    /// Join a service-relative output path with the base address and a
    /// millisecond disambiguator so a regenerated same-named artifact is
    /// never served from a stale cache.
    pub fn asset_url(&self, output_url: &str, millis: u64) -> String {
        join_asset_url(&self.base_url, output_url, millis)
    }

    /// Fetch the artifact bytes. Used by the image view to flip its
    /// loaded sub-state once the asset is actually retrievable.
    pub async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .context("failed to fetch generated asset")?;
        let resp = resp.error_for_status().context("asset request failed")?;
        let bytes = resp.bytes().await.context("failed to read asset body")?;
        Ok(bytes.to_vec())
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .context("health request failed")?;
        let health = resp
            .json::<HealthResponse>()
            .await
            .context("failed to decode health response")?;
        Ok(health)
    }
}

/// Base address + service-relative path + `?t=` disambiguator.
pub fn join_asset_url(base_url: &str, output_url: &str, millis: u64) -> String {
    format!("{}{}?t={}", base_url, output_url, millis)
}

/// Milliseconds since the Unix epoch; cache-buster and `retrieved_at`.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Non-2xx response: surface the server-provided `detail` when present.
fn interpret_failure(status: u16, body: &str) -> GenerateError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail);
    GenerateError::Server(detail.unwrap_or_else(|| format!("Server error: {}", status)))
}

/// 2xx response: distinguish a real artifact from a logical failure
/// (explicit error status or missing output path).
fn interpret_success(body: &str) -> Result<GenerationArtifact, GenerateError> {
    let decoded = serde_json::from_str::<VisualizationResponse>(body)
        .map_err(|e| GenerateError::Transport(e.to_string()))?;

    if decoded.status == "error" {
        return Err(GenerateError::Generation(decoded.error.unwrap_or_else(
            || "Failed to generate visualization".to_string(),
        )));
    }
    let Some(output_url) = decoded.output_url else {
        return Err(GenerateError::Generation(decoded.error.unwrap_or_else(
            || "Failed to generate visualization".to_string(),
        )));
    };

    Ok(GenerationArtifact {
        output_url,
        logs: decoded.logs,
        metadata: decoded.metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_yields_artifact() {
        let body = r#"{"status":"success","output_url":"/files/out.png","logs":"done"}"#;
        let artifact = interpret_success(body).unwrap();
        assert_eq!(artifact.output_url, "/files/out.png");
        assert_eq!(artifact.logs.as_deref(), Some("done"));
    }

    #[test]
    fn error_status_with_message_is_generation_failure() {
        let body = r#"{"status":"error","error":"boom"}"#;
        let err = interpret_success(body).unwrap_err();
        assert_eq!(err, GenerateError::Generation("boom".to_string()));
    }

    #[test]
    fn missing_output_url_is_generation_failure_with_fallback() {
        let body = r#"{"status":"success"}"#;
        let err = interpret_success(body).unwrap_err();
        assert_eq!(
            err,
            GenerateError::Generation("Failed to generate visualization".to_string())
        );
    }

    #[test]
    fn non_2xx_uses_detail_field() {
        let err = interpret_failure(400, r#"{"detail":"bad request"}"#);
        assert_eq!(err, GenerateError::Server("bad request".to_string()));
    }

    #[test]
    fn non_2xx_without_detail_uses_status_code() {
        let err = interpret_failure(502, "upstream died");
        assert_eq!(err, GenerateError::Server("Server error: 502".to_string()));
    }

    #[test]
    fn error_display_strings_are_user_facing() {
        assert_eq!(GenerateError::EmptyInput.to_string(), "Please enter some code");
        assert_eq!(
            GenerateError::Transport("connection refused".into()).to_string(),
            "connection refused"
        );
    }

    #[test]
    fn asset_url_is_cache_busted() {
        let url = join_asset_url("http://localhost:8000", "/files/out.png", 1712000000123);
        let (path, query) = url.split_once("?t=").unwrap();
        assert_eq!(path, "http://localhost:8000/files/out.png");
        assert!(query.parse::<u64>().is_ok());
    }

    #[test]
    fn request_serializes_to_wire_names() {
        let req = VisualizationRequest {
            code: "plot(1)".to_string(),
            language: Language::R,
            visualization_type: VisualizationKind::Interactive,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["language"], "r");
        assert_eq!(json["visualization_type"], "interactive");
        assert_eq!(json["code"], "plot(1)");
    }
}
