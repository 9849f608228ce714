//! Handler for `POST /webhook`.

use std::sync::Arc;

use axum::{Json, extract::State};
use bytes::Bytes;
use chrono::Utc;
use ringside_core::{CallResult, store::ResultStore};
use serde::Serialize;

use crate::error::ApiError;

/// Acknowledgement returned for every accepted webhook call.
#[derive(Debug, Serialize)]
pub struct ReceivedAck {
  pub received: bool,
}

/// `POST /webhook` — ingest one vendor notification.
///
/// The body is read raw and parsed here rather than through the `Json`
/// extractor: a parse failure must answer with the exact
/// `{"error": "Invalid webhook payload."}` body, and the extractor's
/// rejection format differs. A failed parse never touches the store;
/// a successful one appends exactly once. There is no deduplication —
/// redelivery is the vendor's concern, expressed through its own retry
/// policy on non-2xx responses.
pub async fn receive<S>(
  State(store): State<Arc<S>>,
  body: Bytes,
) -> Result<Json<ReceivedAck>, ApiError>
where
  S: ResultStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let record = CallResult::parse(&body, Utc::now()).map_err(|e| {
    tracing::warn!(error = %e, "rejected webhook payload");
    ApiError::InvalidPayload
  })?;

  tracing::info!(
    fields = record.payload.len(),
    has_contact = record.has_contact(),
    "webhook received"
  );

  store
    .append(record)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(ReceivedAck { received: true }))
}
