//! HTTP server for ringside.
//!
//! Composes the webhook/status API from `ringside-api` with the booking
//! endpoint, on top of the in-memory store backend.

pub mod booking;
pub mod error;

pub use error::BookingError;

use std::sync::Arc;

use axum::{Router, routing::post};
use ringside_core::store::ResultStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` (with
/// `RINGSIDE_*` environment overrides).
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  /// Externally reachable base URL of this server; `/webhook` is appended
  /// to form the callback URL handed to the vendor.
  pub public_url:     String,
  /// Retention cap of the in-memory event store.
  #[serde(default = "default_store_capacity")]
  pub store_capacity: usize,
  pub vendor:         VendorConfig,
  #[serde(default)]
  pub venues:         Vec<Venue>,
}

/// Settings for the outbound-calling vendor API.
#[derive(Deserialize, Clone)]
pub struct VendorConfig {
  pub api_url:                 String,
  /// Vendor API key. Left empty (e.g. supplied via
  /// `RINGSIDE_VENDOR__API_KEY`) the booking endpoint answers 500.
  #[serde(default)]
  pub api_key:                 String,
  #[serde(default = "default_voice")]
  pub voice:                   String,
  #[serde(default = "default_language")]
  pub language:                String,
  #[serde(default = "default_max_call_duration")]
  pub max_call_duration:       u32,
  /// Call script with `{city}`, `{start_date}`, `{end_date}`, `{style}`,
  /// `{notes}` and `{venue}` placeholders.
  pub script_template:         String,
  pub first_sentence_template: String,
}

/// One venue the booking endpoint will call.
#[derive(Deserialize, Clone)]
pub struct Venue {
  pub name:  String,
  pub phone: String,
}

fn default_store_capacity() -> usize {
  ringside_store_memory::DEFAULT_CAPACITY
}

fn default_voice() -> String {
  "Estella".to_string()
}

fn default_language() -> String {
  "eng".to_string()
}

fn default_max_call_duration() -> u32 {
  300
}

// ─── Application state ────────────────────────────────────────────────────────

/// State for the booking endpoint. The store is not part of it; the API
/// router carries the store as its own state.
#[derive(Clone)]
pub struct AppState {
  pub http:   reqwest::Client,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: `/webhook`, `/status`, `/book`.
pub fn router<S>(store: Arc<S>, state: AppState) -> Router
where
  S: ResultStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  ringside_api::api_router(store)
    .merge(
      Router::new()
        .route("/book", post(booking::submit))
        .with_state(state),
    )
    .layer(TraceLayer::new_for_http())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
