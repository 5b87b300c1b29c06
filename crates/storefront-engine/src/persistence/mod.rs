//! Durable mirror of the cart and the order history.
//!
//! State lives in the actors; storage only ever receives whole-collection JSON snapshots.
//! Each actor serializes its collection at commit time and hands the blob to the
//! [`SnapshotWriter`], a single background task that saves blobs in the order they were
//! committed. Storage failures are logged and never undo or fail the mutation.
//!
//! On startup, an absent key is empty state and an unreadable blob is logged and treated
//! as empty.

mod file;
mod memory;
mod sinks;
mod writer;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sinks::{CartSnapshot, OrderHistorySnapshot};
pub use writer::{SnapshotWriter, WriterHandle};

use crate::model::{LineItem, Order};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to read {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("Failed to write {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("Corrupt snapshot under {key}: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
}

/// String blobs under string keys. Implementations must be safe to call from a blocking
/// thread.
pub trait KeyValueStore: Send + Sync + 'static {
    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn save(&self, key: &str, blob: &str) -> Result<(), PersistenceError>;

    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Parses the blob under `key`. Absent keys are `Ok(None)`.
pub fn read_snapshot<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, PersistenceError> {
    let Some(blob) = store.load(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&blob)
        .map(Some)
        .map_err(|source| PersistenceError::Corrupt {
            key: key.to_string(),
            source,
        })
}

fn load_or_empty<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    match read_snapshot::<Vec<T>>(store, key) {
        Ok(Some(items)) => {
            debug!(key, count = items.len(), "Snapshot restored");
            items
        }
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Snapshot unreadable, starting empty");
            Vec::new()
        }
    }
}

/// The persisted cart lines, or empty.
pub fn load_cart(store: &dyn KeyValueStore, key: &str) -> Vec<LineItem> {
    load_or_empty(store, key)
}

/// The persisted order history (most recent first), or empty.
pub fn load_orders(store: &dyn KeyValueStore, key: &str) -> Vec<Order> {
    load_or_empty(store, key)
}
