//! JSON HTTP surface for the ringside event store.
//!
//! Exposes an axum [`Router`] backed by any [`ringside_core::ResultStore`]:
//! the webhook ingestion endpoint the vendor calls back into, and the
//! status query endpoint the client poller drains. Transport concerns and
//! any further routes are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(ringside_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod status;
pub mod webhook;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use ringside_core::store::ResultStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ResultStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/webhook", post(webhook::receive::<S>))
    .route("/status", get(status::snapshot::<S>))
    .with_state(store)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    response::Response,
  };
  use chrono::{DateTime, Utc};
  use ringside_store_memory::MemoryStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::api_router;

  fn test_router() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::new());
    (store.clone(), api_router(store))
  }

  async fn post_webhook(router: &Router, body: &str) -> Response {
    router
      .clone()
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/webhook")
          .header("content-type", "application/json")
          .body(Body::from(body.to_string()))
          .unwrap(),
      )
      .await
      .unwrap()
  }

  async fn get_status(router: &Router) -> Response {
    router
      .clone()
      .oneshot(
        Request::builder()
          .method("GET")
          .uri("/status")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap()
  }

  async fn body_json(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── Webhook ingestion ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn valid_post_is_acknowledged_and_appended() {
    let (store, router) = test_router();
    let before = Utc::now();

    let resp = post_webhook(&router, r#"{"call_id":"abc","status":"completed"}"#).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "received": true }));
    assert_eq!(store.len().await, 1);

    let results = body_json(get_status(&router).await).await;
    let record = &results["results"][0];
    // Superset of the posted fields, plus the server-assigned timestamp.
    assert_eq!(record["call_id"], json!("abc"));
    assert_eq!(record["status"], json!("completed"));
    let received_at: DateTime<Utc> =
      record["receivedAt"].as_str().unwrap().parse().unwrap();
    assert!(received_at >= before);
    assert!(received_at <= Utc::now());
  }

  #[tokio::test]
  async fn invalid_body_is_rejected_without_append() {
    let (store, router) = test_router();

    let resp = post_webhook(&router, "definitely not json").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      body_json(resp).await,
      json!({ "error": "Invalid webhook payload." })
    );
    assert_eq!(store.len().await, 0);
  }

  #[tokio::test]
  async fn non_object_json_is_rejected() {
    let (store, router) = test_router();

    for body in ["42", "\"text\"", "[{\"a\":1}]", "null"] {
      let resp = post_webhook(&router, body).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
    assert_eq!(store.len().await, 0);
  }

  #[tokio::test]
  async fn duplicate_posts_yield_two_records() {
    let (store, router) = test_router();

    for _ in 0..2 {
      let resp = post_webhook(&router, r#"{"call_id":"abc"}"#).await;
      assert_eq!(resp.status(), StatusCode::OK);
    }
    assert_eq!(store.len().await, 2);
  }

  #[tokio::test]
  async fn posts_are_returned_in_arrival_order() {
    let (_store, router) = test_router();

    for i in 0..4 {
      post_webhook(&router, &format!(r#"{{"call_id":"c{i}"}}"#)).await;
    }

    let results = body_json(get_status(&router).await).await;
    let ids: Vec<_> = results["results"]
      .as_array()
      .unwrap()
      .iter()
      .map(|r| r["call_id"].as_str().unwrap().to_string())
      .collect();
    assert_eq!(ids, ["c0", "c1", "c2", "c3"]);
  }

  // ── Contact extraction through the endpoint ───────────────────────────────

  #[tokio::test]
  async fn entities_email_surfaces_on_the_record() {
    let (_store, router) = test_router();

    post_webhook(&router, r#"{"entities":{"email":"a@b.com"}}"#).await;

    let results = body_json(get_status(&router).await).await;
    assert_eq!(results["results"][0]["email"], json!("a@b.com"));
  }

  #[tokio::test]
  async fn top_level_email_wins() {
    let (_store, router) = test_router();

    post_webhook(
      &router,
      r#"{"email":"x@y.com","entities":{"email":"a@b.com"}}"#,
    )
    .await;

    let results = body_json(get_status(&router).await).await;
    assert_eq!(results["results"][0]["email"], json!("x@y.com"));
  }

  #[tokio::test]
  async fn call_id_with_entities_phone_scenario() {
    let (_store, router) = test_router();

    post_webhook(
      &router,
      r#"{"call_id": "abc", "entities": {"phone": "+15551234567"}}"#,
    )
    .await;

    let results = body_json(get_status(&router).await).await;
    let record = results["results"][0].as_object().unwrap();
    assert_eq!(record.len(), 3, "unexpected keys: {record:?}");
    assert_eq!(record["call_id"], json!("abc"));
    assert_eq!(record["phone"], json!("+15551234567"));
    assert!(record["receivedAt"].is_string());
  }

  // ── Status query ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn empty_store_returns_empty_results() {
    let (_store, router) = test_router();

    let resp = get_status(&router).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "results": [] }));
  }

  #[tokio::test]
  async fn status_query_has_no_side_effects() {
    let (store, router) = test_router();
    post_webhook(&router, r#"{"call_id":"abc"}"#).await;

    for _ in 0..3 {
      get_status(&router).await;
    }
    assert_eq!(store.len().await, 1);
  }
}
