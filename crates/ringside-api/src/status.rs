//! Handler for `GET /status`.

use std::sync::Arc;

use axum::{Json, extract::State};
use ringside_core::{CallResult, store::ResultStore};
use serde::Serialize;

use crate::error::ApiError;

/// Wire shape of the status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
  pub results: Vec<CallResult>,
}

/// `GET /status` — the full current snapshot of the event store.
///
/// No parameters, no filtering, no pagination; arrival order, every time,
/// including `{"results": []}` on an empty store. Pure read.
pub async fn snapshot<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<StatusResponse>, ApiError>
where
  S: ResultStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let results = store
    .snapshot()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(StatusResponse { results }))
}
