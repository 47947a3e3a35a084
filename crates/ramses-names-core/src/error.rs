// ── Core error types ──
//
// `CoreError` covers observations the resolver refuses to apply.
// `StoreError` covers persistence failures. Neither ever reaches a
// label query: resolution degrades to the "unknown" sentinel instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::EntityKind;

/// Errors raised while validating or applying an observation.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid {kind} observation for key '{key}': {reason}")]
    InvalidObservation {
        kind: EntityKind,
        key: String,
        reason: String,
    },

    #[error("Invalid role observation for zone '{zone_index}': {reason}")]
    InvalidRoleObservation { zone_index: String, reason: String },
}

/// Errors raised by a [`SnapshotStore`](crate::store::SnapshotStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache file {path} is malformed: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to move snapshot into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raised by [`MemoryStore`](crate::store::MemoryStore) in failing mode.
    #[error("Simulated write failure")]
    Simulated,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
