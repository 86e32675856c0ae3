//! Uploads generated datasets to a running plot server.

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::config::OutputConfig;
use crate::error::{Result, TerrainError};
use crate::export::{export, to_csv_string};
use crate::projector::Point;

/// Response from the dataset upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetInfo {
    pub id: String,
    pub filename: String,
    pub bytes: usize,
    pub preview: Vec<String>,
}

/// HTTP client for the plot server's dataset API.
pub struct PlotterClient {
    client: Client,
    base_url: String,
}

impl PlotterClient {
    /// Creates a client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Checks that the server answers its health endpoint.
    pub async fn check_health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(TerrainError::Upload(format!(
                "Health check returned status {}",
                resp.status()
            )))
        }
    }

    /// Uploads a CSV document as a new dataset.
    pub async fn upload_dataset(&self, filename: &str, contents: Vec<u8>) -> Result<DatasetInfo> {
        let url = format!("{}/datasets", self.base_url);
        let part = Part::bytes(contents)
            .file_name(filename.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        debug!("Uploading {} to {}", filename, url);
        let resp = self.client.post(&url).multipart(form).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TerrainError::Upload(format!("{status}: {body}")));
        }

        Ok(resp.json::<DatasetInfo>().await?)
    }
}

/// Writes points to the configured CSV path and, when a plot server is
/// configured, uploads the same document as a dataset.
pub async fn deliver(points: &[Point], output: &OutputConfig) -> Result<Option<DatasetInfo>> {
    export(points, &output.path)?;

    let Some(url) = output.plotter_url.as_deref() else {
        return Ok(None);
    };

    let client = PlotterClient::new(url);
    client.check_health().await?;

    let filename = output
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "terrain.csv".to_string());
    let info = client
        .upload_dataset(&filename, to_csv_string(points)?.into_bytes())
        .await?;
    tracing::info!("Uploaded dataset {} to {}", info.id, client.base_url());
    Ok(Some(info))
}
