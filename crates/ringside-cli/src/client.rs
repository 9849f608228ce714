//! Async HTTP client wrapping the ringside JSON API.

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use ringside_core::CallResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Connection settings for the ringside API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// JSON body sent to `POST /book`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
  pub city:       String,
  pub start_date: String,
  pub end_date:   String,
  pub style:      String,
  pub notes:      String,
}

#[derive(Deserialize)]
struct StatusResponse {
  results: Vec<CallResult>,
}

/// Async HTTP client for the ringside JSON API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `GET /status` — the full snapshot, in arrival order.
  pub async fn get_status(&self) -> Result<Vec<CallResult>> {
    let resp = self
      .client
      .get(self.url("/status"))
      .send()
      .await
      .context("GET /status failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /status → {}", resp.status()));
    }
    let body: StatusResponse = resp.json().await.context("deserialising status")?;
    Ok(body.results)
  }

  /// `POST /book` — returns the server's confirmation message.
  pub async fn submit_booking(&self, request: &BookingRequest) -> Result<String> {
    let resp = self
      .client
      .post(self.url("/book"))
      .json(request)
      .send()
      .await
      .context("POST /book failed")?;

    let status = resp.status();
    let body: Value = resp.json().await.context("deserialising booking response")?;
    if status.is_success() {
      Ok(
        body["message"]
          .as_str()
          .unwrap_or("Booking request sent!")
          .to_string(),
      )
    } else {
      Err(anyhow!(
        "{}",
        body["error"].as_str().unwrap_or("booking request failed")
      ))
    }
  }
}
