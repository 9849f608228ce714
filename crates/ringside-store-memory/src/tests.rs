//! Tests for `MemoryStore`.

use chrono::Utc;
use ringside_core::{CallResult, ResultStore};
use serde_json::json;

use crate::MemoryStore;

fn record(tag: &str) -> CallResult {
  let payload = match json!({ "call_id": tag }) {
    serde_json::Value::Object(map) => map,
    _ => unreachable!(),
  };
  CallResult::from_payload(payload, Utc::now())
}

fn call_id(r: &CallResult) -> &str {
  r.payload_str("call_id").unwrap()
}

#[tokio::test]
async fn starts_empty() {
  let store = MemoryStore::new();
  assert!(store.is_empty().await);
  assert_eq!(store.snapshot().await.unwrap(), vec![]);
}

#[tokio::test]
async fn append_then_snapshot() {
  let store = MemoryStore::new();
  store.append(record("a")).await.unwrap();

  let snap = store.snapshot().await.unwrap();
  assert_eq!(snap.len(), 1);
  assert_eq!(call_id(&snap[0]), "a");
}

#[tokio::test]
async fn preserves_arrival_order() {
  let store = MemoryStore::new();
  for tag in ["a", "b", "c", "d"] {
    store.append(record(tag)).await.unwrap();
  }

  let snap = store.snapshot().await.unwrap();
  let ids: Vec<_> = snap.iter().map(call_id).collect();
  assert_eq!(ids, ["a", "b", "c", "d"]);
}

#[tokio::test]
async fn identical_records_are_not_deduplicated() {
  let store = MemoryStore::new();
  let r = record("same");
  store.append(r.clone()).await.unwrap();
  store.append(r).await.unwrap();
  assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn snapshot_does_not_observe_later_appends() {
  let store = MemoryStore::new();
  store.append(record("a")).await.unwrap();

  let snap = store.snapshot().await.unwrap();
  store.append(record("b")).await.unwrap();

  assert_eq!(snap.len(), 1);
  assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn capacity_evicts_oldest_first() {
  let store = MemoryStore::with_capacity(3);
  for tag in ["a", "b", "c", "d", "e"] {
    store.append(record(tag)).await.unwrap();
  }

  let snap = store.snapshot().await.unwrap();
  let ids: Vec<_> = snap.iter().map(call_id).collect();
  assert_eq!(ids, ["c", "d", "e"]);
}

#[tokio::test]
async fn zero_capacity_is_clamped() {
  let store = MemoryStore::with_capacity(0);
  store.append(record("only")).await.unwrap();
  assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn concurrent_appends_all_land() {
  let store = MemoryStore::new();

  let mut handles = Vec::new();
  for i in 0..32 {
    let store = store.clone();
    handles.push(tokio::spawn(async move {
      store.append(record(&format!("r{i}"))).await.unwrap();
    }));
  }
  for handle in handles {
    handle.await.unwrap();
  }

  assert_eq!(store.len().await, 32);
}

#[tokio::test]
async fn clones_share_the_same_store() {
  let store = MemoryStore::new();
  let clone = store.clone();

  store.append(record("a")).await.unwrap();
  assert_eq!(clone.len().await, 1);
}
