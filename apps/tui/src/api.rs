//! HTTP client for the reservoir backend.
//!
//! Every call is a single attempt bounded by the configured timeout. A
//! non-2xx answer is reported as [`ApiError::Status`].

use std::path::PathBuf;

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::app::submission::{export_file_name, ReportPayload};
use crate::config::Settings;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("could not save export: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend ids are integers; older data uses strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

/// One row of `GET /api/reservoirs/all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub id: EntryId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub fili: Option<String>,
}

/// Reply to `POST /submit_data/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    export_dir: PathBuf,
    http: Client,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(settings.http_timeout).build()?;
        Ok(Self {
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            export_dir: settings.export_dir.clone(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_directory(&self) -> Result<Vec<DirectoryEntry>, ApiError> {
        let url = format!("{}/api/reservoirs/all", self.base_url);
        debug!(%url, "fetching reservoir directory");
        let response = check(self.http.get(&url).send().await?).await?;
        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    pub async fn submit(&self, payload: &ReportPayload) -> Result<Acknowledgement, ApiError> {
        let url = format!("{}/submit_data/", self.base_url);
        info!(
            %url,
            reservoirs = payload.water_reservoirs.len(),
            "submitting report"
        );
        let response = check(self.http.post(&url).json(payload).send().await?).await?;
        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Requests the spreadsheet and writes it into the export directory.
    pub async fn export(&self, payload: &ReportPayload) -> Result<PathBuf, ApiError> {
        let url = format!("{}/generate-excel", self.base_url);
        info!(%url, date = %payload.date, "requesting spreadsheet export");
        let response = check(self.http.post(&url).json(payload).send().await?).await?;
        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(&self.export_dir).await?;
        let path = self.export_dir.join(export_file_name(&payload.date));
        tokio::fs::write(&path, &bytes).await?;
        info!(path = %path.display(), size = bytes.len(), "spreadsheet saved");
        Ok(path)
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}
