// ── Domain model ──
//
// Validated entities, device roles, the cache snapshot, and the
// observation events fed in by the ingestion adapter.

mod entity;
pub(crate) mod epoch;
mod event;
mod role;
mod snapshot;

pub use entity::{EntityKind, NamedEntity, UNKNOWN};
pub use event::{Applied, Observation};
pub use role::DeviceRole;
pub use snapshot::{CacheSnapshot, Outcome, ZoneRoles};
