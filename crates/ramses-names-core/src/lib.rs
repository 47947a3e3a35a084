//! Durable name resolution for RAMSES RF heating metrics.
//!
//! Radio traffic identifies zones by a short index (`"02"`) and devices by
//! an address (`"04:122498"`). This crate keeps the mapping from those
//! identifiers to operator-assigned names and zone roles, and serves it as
//! metric labels:
//!
//! - **[`NameResolver`]** - The authoritative cache. Applies
//!   [`Observation`]s with last-writer-wins conflict handling, reports each
//!   change as an [`Outcome`], and saves through a [`SnapshotStore`] whenever
//!   something actually changed.
//!
//! - **[`JsonFileStore`]** - Atomic load/save of the whole
//!   [`CacheSnapshot`] as one JSON document (temp file + rename). Missing or
//!   corrupt files start an empty cache instead of failing.
//!
//! - **[`LabelView`]** / **[`LabelSource`]** - Read-only label queries
//!   (`zone_name`, `device_name`) over one consistent snapshot; misses fall
//!   back to [`UNKNOWN`].

pub mod error;
pub mod labels;
pub mod model;
pub mod resolver;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::{CoreError, StoreError};
pub use labels::{LabelSource, LabelView, Labels};
pub use model::{
    Applied, CacheSnapshot, DeviceRole, EntityKind, NamedEntity, Observation, Outcome, UNKNOWN,
    ZoneRoles,
};
pub use resolver::{NameResolver, ResolverStats};
pub use store::{DEFAULT_CACHE_FILE, JsonFileStore, MemoryStore, SnapshotStore};
