//! [`MemoryStore`] — the in-memory implementation of [`ResultStore`].

use std::{collections::VecDeque, convert::Infallible, sync::Arc};

use ringside_core::{CallResult, ResultStore};
use tokio::sync::RwLock;

/// Records retained when no explicit capacity is configured.
pub const DEFAULT_CAPACITY: usize = 4096;

/// An event store held in process memory.
///
/// Cloning is cheap — the record sequence is reference-counted, so all
/// clones observe the same store. The write lock is held only for the
/// duration of a single push or copy, which gives appends and snapshots the
/// required atomicity: a snapshot observes the sequence before or after a
/// concurrent append, never a torn record.
///
/// Retention is a size cap: once `capacity` records are held, each append
/// evicts the oldest record first, so the store always holds the most
/// recent `capacity` records in arrival order.
#[derive(Clone)]
pub struct MemoryStore {
  records:  Arc<RwLock<VecDeque<CallResult>>>,
  capacity: usize,
}

impl MemoryStore {
  /// Create an empty store with [`DEFAULT_CAPACITY`].
  pub fn new() -> Self {
    Self::with_capacity(DEFAULT_CAPACITY)
  }

  /// Create an empty store retaining at most `capacity` records.
  ///
  /// A capacity of zero is clamped to one; an empty store that can never
  /// hold a record is not a useful configuration.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      records:  Arc::new(RwLock::new(VecDeque::new())),
      capacity: capacity.max(1),
    }
  }

  /// Number of records currently held.
  pub async fn len(&self) -> usize {
    self.records.read().await.len()
  }

  /// Whether the store holds no records.
  pub async fn is_empty(&self) -> bool {
    self.records.read().await.is_empty()
  }
}

impl Default for MemoryStore {
  fn default() -> Self {
    Self::new()
  }
}

impl ResultStore for MemoryStore {
  type Error = Infallible;

  async fn append(&self, record: CallResult) -> Result<(), Infallible> {
    let mut records = self.records.write().await;
    while records.len() >= self.capacity {
      records.pop_front();
    }
    records.push_back(record);
    Ok(())
  }

  async fn snapshot(&self) -> Result<Vec<CallResult>, Infallible> {
    Ok(self.records.read().await.iter().cloned().collect())
  }
}
