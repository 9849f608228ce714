//! In-memory backend for the ringside event store.
//!
//! Process-local, initialized empty at process start, gone at process exit.
//! Persistence and multi-instance consistency are explicit non-goals; what
//! this backend adds over a bare `Vec` is a retention cap, so the store
//! cannot grow without bound under sustained webhook volume.

mod store;

pub use store::{DEFAULT_CAPACITY, MemoryStore};

#[cfg(test)]
mod tests;
