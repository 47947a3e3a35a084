// ── In-memory store ──

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::SnapshotStore;
use crate::error::StoreError;
use crate::model::CacheSnapshot;

/// Store that keeps the last saved snapshot in memory.
///
/// Counts saves and can be told to fail, which makes persistence policy
/// observable without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Option<CacheSnapshot>>,
    saves: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot, as if it had been saved earlier.
    pub fn with_snapshot(snapshot: CacheSnapshot) -> Self {
        Self {
            saved: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Last successfully saved snapshot.
    pub fn saved(&self) -> Option<CacheSnapshot> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Make every following save fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> CacheSnapshot {
        self.saved().unwrap_or_default()
    }

    fn save(&self, snapshot: &CacheSnapshot) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Simulated);
        }
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
