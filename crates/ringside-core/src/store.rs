//! The `ResultStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `ringside-store-memory`). Higher layers (`ringside-api`,
//! `ringside-server`) depend on this abstraction, not on any concrete
//! backend, which keeps the store unit-testable in isolation and makes a
//! persistent or shared backend a conscious future extension point.

use std::future::Future;

use crate::record::CallResult;

/// Abstraction over an event-store backend for call results.
///
/// The store is an ordered sequence: insertion order is arrival order.
/// Writes are append-only; there is no deletion, no indexing by key, and no
/// record identity beyond position.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`). Implementations
/// must keep `append` atomic with respect to concurrent appends and
/// snapshots: a snapshot taken during an append observes the old or the new
/// length, never a torn record.
pub trait ResultStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append one record to the end of the sequence.
  fn append(
    &self,
    record: CallResult,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Return a point-in-time copy of the full sequence, in arrival order.
  ///
  /// Callers must not observe later appends through a previously taken
  /// snapshot.
  fn snapshot(
    &self,
  ) -> impl Future<Output = Result<Vec<CallResult>, Self::Error>> + Send + '_;
}
