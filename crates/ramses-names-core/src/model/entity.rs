// ── Named entity types ──
//
// A NamedEntity is the only way a name enters the cache. Its constructor
// enforces the invariants every later mutation relies on: a non-empty key,
// a real name, and ordered timestamps.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Label value used whenever a name cannot be resolved.
pub const UNKNOWN: &str = "unknown";

/// Which namespace a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Zone,
    Device,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zone => "zone",
            Self::Device => "device",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A zone or device together with its operator-assigned name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedEntity {
    key: String,
    kind: EntityKind,
    name: String,
    first_seen: DateTime<Utc>,
    last_seen: DateTime<Utc>,
}

impl NamedEntity {
    /// Build a validated entity.
    ///
    /// Timestamps are truncated to microseconds, the precision of the
    /// persisted document.
    pub fn new(
        kind: EntityKind,
        key: impl Into<String>,
        name: impl Into<String>,
        first_seen: DateTime<Utc>,
        last_seen: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let key = key.into();
        let name = name.into();
        validate(kind, &key, &name)?;

        let first_seen = first_seen.trunc_subsecs(6);
        let last_seen = last_seen.trunc_subsecs(6);
        if first_seen > last_seen {
            return Err(CoreError::InvalidObservation {
                kind,
                key,
                reason: format!("first_seen {first_seen} is after last_seen {last_seen}"),
            });
        }

        Ok(Self {
            key,
            kind,
            name,
            first_seen,
            last_seen,
        })
    }

    /// Entity seen for the first time at `seen`.
    pub fn first_observed(
        kind: EntityKind,
        key: impl Into<String>,
        name: impl Into<String>,
        seen: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        Self::new(kind, key, name, seen, seen)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn first_seen(&self) -> DateTime<Utc> {
        self.first_seen
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    /// Advance `last_seen`; an older timestamp leaves it where it is.
    pub(crate) fn touch(&mut self, seen: DateTime<Utc>) {
        let seen = seen.trunc_subsecs(6);
        if seen > self.last_seen {
            self.last_seen = seen;
        }
    }

    /// Replace the name, returning the previous one. `name` must already
    /// have passed [`validate`].
    pub(crate) fn rename(&mut self, name: String, seen: DateTime<Utc>) -> String {
        self.touch(seen);
        std::mem::replace(&mut self.name, name)
    }
}

/// Reject keys and names that must never be stored.
pub(crate) fn validate(kind: EntityKind, key: &str, name: &str) -> Result<(), CoreError> {
    let reason = if key.trim().is_empty() {
        "key is empty"
    } else if key == UNKNOWN {
        "key is the reserved value 'unknown'"
    } else if name.trim().is_empty() {
        "name is empty"
    } else if name == UNKNOWN {
        "name is the reserved value 'unknown'"
    } else {
        return Ok(());
    };

    Err(CoreError::InvalidObservation {
        kind,
        key: key.to_owned(),
        reason: reason.to_owned(),
    })
}
