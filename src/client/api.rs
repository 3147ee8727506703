use crate::{
    error::ErrorResponse,
    models::{ChainResult, HealthStatus, HistoryEntry, SimulateResponse},
};
use anyhow::{bail, Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::BTreeMap;

/// Typed client for a running gas tracker.
pub struct GasTrackerClient {
    base_url: String,
    http: Client,
}

impl GasTrackerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub async fn prices(&self) -> Result<BTreeMap<String, Option<f64>>> {
        self.get("/api/gas-history").await
    }

    pub async fn simulate(&self, eth_amount: f64) -> Result<Vec<ChainResult>> {
        let response = self
            .http
            .post(format!("{}/api/v1/simulate", self.base_url))
            .json(&json!({ "ethAmount": eth_amount }))
            .send()
            .await
            .context("POST /api/v1/simulate")?;

        let body: SimulateResponse = decode(response).await?;
        Ok(body.data)
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.get("/gas-history").await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.get("/health").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .with_context(|| format!("GET {}", path))?;

        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.context("Invalid response body");
    }

    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(err) => bail!("{} ({}): {}", status, err.error_code, err.error),
        Err(_) => bail!("{}: {}", status, text),
    }
}
