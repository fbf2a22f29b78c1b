//! HTTP client for the Bernard backend.
//!
//! Single choke point for all backend calls. Every method resolves to a
//! value or a typed [`ApiError`]; network failures and non-2xx responses
//! are normalized to the same failure shape so callers never need to
//! distinguish transport errors from application errors. Absence of a
//! successful status response means "unknown", not "not running".

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::models::{Lead, Run, ScanConfig, ScanTarget, Stats, StatusSnapshot};
use crate::http_client;

/// Fallback endpoint used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://bernard-scraperg.onrender.com";
/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "BERNARD_API_URL";

const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

/// Errors surfaced by backend calls. Any variant means the operation
/// failed; the UI treats them all as "backend offline".
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Invalid response: {0}")]
    Decode(String),
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RunsEnvelope {
    #[serde(default)]
    runs: Vec<Run>,
}

#[derive(Debug, Deserialize)]
struct LeadsEnvelope {
    #[serde(default)]
    leads: Vec<Lead>,
}

impl ApiClient {
    /// Build a client against an explicit base URL. Trailing slashes are
    /// trimmed so path joins stay predictable.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Resolve the base URL from the environment override, falling back
    /// to the documented default endpoint.
    pub fn from_env() -> Self {
        let base = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the server-side CSV export, opened directly in the browser.
    pub fn export_csv_url(&self) -> String {
        format!("{}/api/leads/export.csv", self.base_url)
    }

    pub fn get_status(&self) -> Result<StatusSnapshot, ApiError> {
        self.get_json("/api/status")
    }

    pub fn get_stats(&self) -> Result<Stats, ApiError> {
        self.get_json("/api/stats")
    }

    /// Fetch recent runs, newest first by the backend's ordering. The
    /// backend endpoint takes no limit; the list is truncated here and
    /// never re-sorted.
    pub fn get_runs(&self, limit: usize) -> Result<Vec<Run>, ApiError> {
        let envelope: RunsEnvelope = self.get_json("/api/runs")?;
        let mut runs = envelope.runs;
        runs.truncate(limit);
        Ok(runs)
    }

    pub fn get_leads(&self, limit: usize) -> Result<Vec<Lead>, ApiError> {
        let envelope: LeadsEnvelope = self.get_json(&format!("/api/leads?limit={limit}"))?;
        Ok(envelope.leads)
    }

    pub fn get_config(&self) -> Result<ScanConfig, ApiError> {
        self.get_json("/api/config")
    }

    pub fn save_config(&self, config: &ScanConfig) -> Result<(), ApiError> {
        self.post_json(
            "/api/config",
            Some(serde_json::to_value(config).map_err(|err| ApiError::Decode(err.to_string()))?),
        )
    }

    pub fn start_single_scan(&self, target: &ScanTarget) -> Result<(), ApiError> {
        self.post_json("/api/scan/single", Some(target.body()))
    }

    pub fn start_auto_scan(&self, target: &ScanTarget, days: u32) -> Result<(), ApiError> {
        let mut body = target.body();
        body["days"] = serde_json::json!(days);
        self.post_json("/api/scan/auto", Some(body))
    }

    pub fn stop_scan(&self) -> Result<(), ApiError> {
        self.post_json("/api/scan/stop", None)
    }

    /// Wipe the backend lead database. Destructive; the UI requires an
    /// explicit confirm step before invoking this.
    pub fn clear_database(&self) -> Result<(), ApiError> {
        self.post_json("/api/clear", None)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let response = match http_client::agent()
            .get(&url)
            .set("Accept", "application/json")
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(ApiError::Status(code)),
            Err(ureq::Error::Transport(err)) => return Err(ApiError::Transport(err.to_string())),
        };
        decode_json(response)
    }

    fn post_json(&self, path: &str, body: Option<serde_json::Value>) -> Result<(), ApiError> {
        let url = format!("{}{path}", self.base_url);
        let request = http_client::agent()
            .post(&url)
            .set("Accept", "application/json");
        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };
        match result {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, _)) => Err(ApiError::Status(code)),
            Err(ureq::Error::Transport(err)) => Err(ApiError::Transport(err.to_string())),
        }
    }
}

fn decode_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T, ApiError> {
    let bytes = http_client::read_response_bytes(response, MAX_RESPONSE_BYTES)
        .map_err(|err| ApiError::Decode(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}
