//! Booking endpoint error type.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by the booking handler. The response bodies are fixed
/// strings the surrounding form UI matches on.
#[derive(Debug, Error)]
pub enum BookingError {
  #[error("invalid request")]
  InvalidRequest,

  #[error("missing required fields")]
  MissingFields,

  #[error("vendor API key not set")]
  ApiKeyNotSet,
}

impl IntoResponse for BookingError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      BookingError::InvalidRequest => (StatusCode::BAD_REQUEST, "Invalid request."),
      BookingError::MissingFields => {
        (StatusCode::BAD_REQUEST, "Missing required fields.")
      }
      BookingError::ApiKeyNotSet => {
        (StatusCode::INTERNAL_SERVER_ERROR, "Vendor API key not set.")
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
