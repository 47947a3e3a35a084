// ── Snapshot persistence ──
//
// A store loads and saves one complete CacheSnapshot. Loading never
// fails: a missing or unreadable file yields an empty snapshot. Saving
// reports failures so the resolver can log and count them.

mod document;
mod json_file;
mod memory;

pub use json_file::{DEFAULT_CACHE_FILE, JsonFileStore};
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::model::CacheSnapshot;

/// Durable home for the cache snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Load the last complete snapshot, or an empty one on cold start or
    /// corruption.
    fn load(&self) -> CacheSnapshot;

    /// Replace the stored snapshot atomically.
    fn save(&self, snapshot: &CacheSnapshot) -> Result<(), StoreError>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<S> {
    fn load(&self) -> CacheSnapshot {
        (**self).load()
    }

    fn save(&self, snapshot: &CacheSnapshot) -> Result<(), StoreError> {
        (**self).save(snapshot)
    }
}
