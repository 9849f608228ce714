//! `POST /book` — place outbound booking calls through the vendor.
//!
//! The vendor's HTTP status and body are logged and echoed back to the
//! caller but never interpreted; call progress arrives later through the
//! webhook endpoint. One call is placed per configured venue, and a failed
//! vendor call becomes that venue's error outcome without aborting the
//! loop.

use axum::{Json, extract::State};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AppState, Venue, VendorConfig, error::BookingError};

// ─── Request / response ──────────────────────────────────────────────────────

/// JSON body accepted by `POST /book`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
  #[serde(default)]
  pub city:       String,
  #[serde(default)]
  pub start_date: String,
  #[serde(default)]
  pub end_date:   String,
  #[serde(default)]
  pub style:      String,
  #[serde(default)]
  pub notes:      String,
}

impl BookingRequest {
  fn has_required_fields(&self) -> bool {
    !self.city.is_empty()
      && !self.start_date.is_empty()
      && !self.end_date.is_empty()
      && !self.style.is_empty()
  }
}

/// Per-venue outcome of a vendor call attempt.
#[derive(Debug, Serialize)]
pub struct VenueOutcome {
  pub venue:    String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status:   Option<u16>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub response: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:    Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
  pub message: String,
  pub results: Vec<VenueOutcome>,
}

// ─── Vendor payload ──────────────────────────────────────────────────────────

/// Wire shape of one outbound call placement, as the vendor API expects it.
#[derive(Debug, Serialize)]
struct VendorCallRequest<'a> {
  phone_number:      &'a str,
  task:              String,
  voice_id:          &'a str,
  language:          &'a str,
  record:            bool,
  reduce_latency:    bool,
  ivr_mode:          bool,
  wait_for_greeting: bool,
  max_duration:      u32,
  webhook:           &'a str,
  first_sentence:    String,
}

/// Substitute booking fields and the venue name into a script template.
fn render_template(template: &str, request: &BookingRequest, venue: &Venue) -> String {
  template
    .replace("{city}", &request.city)
    .replace("{start_date}", &request.start_date)
    .replace("{end_date}", &request.end_date)
    .replace("{style}", &request.style)
    .replace("{notes}", &request.notes)
    .replace("{venue}", &venue.name)
}

// ─── Handler ─────────────────────────────────────────────────────────────────

/// `POST /book` — validate the booking request and call every configured
/// venue.
pub async fn submit(
  State(state): State<AppState>,
  body: Bytes,
) -> Result<Json<BookingResponse>, BookingError> {
  let request: BookingRequest =
    serde_json::from_slice(&body).map_err(|_| BookingError::InvalidRequest)?;

  if !request.has_required_fields() {
    return Err(BookingError::MissingFields);
  }

  let config = &state.config;
  if config.vendor.api_key.is_empty() {
    tracing::error!("vendor API key is not configured");
    return Err(BookingError::ApiKeyNotSet);
  }

  // The callback URL handed to the vendor must resolve back to our own
  // ingestion endpoint.
  let webhook = format!("{}/webhook", config.public_url.trim_end_matches('/'));

  let mut results = Vec::with_capacity(config.venues.len());
  for venue in &config.venues {
    let payload = VendorCallRequest {
      phone_number:      &venue.phone,
      task:              render_template(&config.vendor.script_template, &request, venue),
      voice_id:          &config.vendor.voice,
      language:          &config.vendor.language,
      record:            true,
      reduce_latency:    true,
      ivr_mode:          false,
      wait_for_greeting: true,
      max_duration:      config.vendor.max_call_duration,
      webhook:           &webhook,
      first_sentence:    render_template(
        &config.vendor.first_sentence_template,
        &request,
        venue,
      ),
    };

    match place_call(&state.http, &config.vendor, &payload).await {
      Ok((status, response)) => {
        tracing::info!(venue = %venue.name, status, "vendor call placed");
        tracing::debug!(venue = %venue.name, %response, "vendor response body");
        results.push(VenueOutcome {
          venue:    venue.name.clone(),
          status:   Some(status),
          response: Some(response),
          error:    None,
        });
      }
      Err(e) => {
        tracing::error!(venue = %venue.name, error = %e, "vendor call failed");
        results.push(VenueOutcome {
          venue:    venue.name.clone(),
          status:   None,
          response: None,
          error:    Some("Failed to initiate call.".to_string()),
        });
      }
    }
  }

  Ok(Json(BookingResponse {
    message: "Booking requests sent to venues!".to_string(),
    results,
  }))
}

/// POST one call placement to the vendor API. Returns the vendor's HTTP
/// status and body verbatim.
async fn place_call(
  http: &reqwest::Client,
  vendor: &VendorConfig,
  payload: &VendorCallRequest<'_>,
) -> Result<(u16, Value), reqwest::Error> {
  let resp = http
    .post(&vendor.api_url)
    .header(reqwest::header::AUTHORIZATION, &vendor.api_key)
    .json(payload)
    .send()
    .await?;

  let status = resp.status().as_u16();
  let body = resp.json::<Value>().await.unwrap_or(Value::Null);
  Ok((status, body))
}
