// ── On-disk document format ──
//
// The operator-visible JSON shape of a cache file. Records are parsed
// loosely here and validated while converting into a CacheSnapshot, so a
// single bad record is dropped instead of discarding the whole file.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::epoch::{from_epoch_seconds, to_epoch_seconds};
use crate::model::{CacheSnapshot, DeviceRole, EntityKind, NamedEntity};

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct SnapshotDocument {
    #[serde(default)]
    pub zones: BTreeMap<String, EntityRecord>,
    #[serde(default)]
    pub devices: BTreeMap<String, EntityRecord>,
    #[serde(default)]
    pub zone_roles: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct EntityRecord {
    pub name: String,
    pub first_seen: f64,
    pub last_seen: f64,
}

impl From<&NamedEntity> for EntityRecord {
    fn from(entity: &NamedEntity) -> Self {
        Self {
            name: entity.name().to_owned(),
            first_seen: to_epoch_seconds(entity.first_seen()),
            last_seen: to_epoch_seconds(entity.last_seen()),
        }
    }
}

impl From<&CacheSnapshot> for SnapshotDocument {
    fn from(snap: &CacheSnapshot) -> Self {
        let records = |kind: EntityKind| -> BTreeMap<String, EntityRecord> {
            snap.entities(kind)
                .iter()
                .map(|(key, entity)| (key.clone(), EntityRecord::from(entity)))
                .collect()
        };

        let zone_roles = snap
            .zone_roles()
            .iter()
            .map(|(zone, roles)| {
                let roles = roles
                    .iter()
                    .map(|(role, devices)| (role.to_string(), devices.iter().cloned().collect()))
                    .collect();
                (zone.clone(), roles)
            })
            .collect();

        Self {
            zones: records(EntityKind::Zone),
            devices: records(EntityKind::Device),
            zone_roles,
            last_updated: snap
                .last_updated()
                .map(|at| at.to_rfc3339_opts(SecondsFormat::Micros, true)),
        }
    }
}

impl SnapshotDocument {
    /// Convert into a validated snapshot, dropping records that break an
    /// entity invariant or name an unknown role.
    pub(crate) fn into_snapshot(self) -> CacheSnapshot {
        let mut snap = CacheSnapshot::new();

        for (kind, records) in [
            (EntityKind::Zone, self.zones),
            (EntityKind::Device, self.devices),
        ] {
            for (key, record) in records {
                match entity_from_record(kind, &key, record) {
                    Ok(entity) => snap.insert_entity(entity),
                    Err(reason) => {
                        warn!(%kind, key = %key, %reason, "skipping invalid cache record");
                    }
                }
            }
        }

        for (zone, roles) in self.zone_roles {
            for (role, devices) in roles {
                let Ok(role) = DeviceRole::from_str(&role) else {
                    warn!(zone = %zone, role = %role, "skipping unknown device role in cache");
                    continue;
                };
                for device in devices {
                    if let Err(e) = snap.observe_role(&zone, role, &device) {
                        warn!(
                            zone = %zone,
                            %role,
                            error = %e,
                            "skipping invalid role link in cache"
                        );
                    }
                }
            }
        }

        if let Some(raw) = self.last_updated.as_deref() {
            match parse_last_updated(raw) {
                Some(at) => snap.set_last_updated(at),
                None => warn!(value = %raw, "ignoring unparsable last_updated"),
            }
        }

        snap
    }
}

fn entity_from_record(
    kind: EntityKind,
    key: &str,
    record: EntityRecord,
) -> Result<NamedEntity, String> {
    let first_seen = from_epoch_seconds(record.first_seen)
        .ok_or_else(|| format!("first_seen {} out of range", record.first_seen))?;
    let last_seen = from_epoch_seconds(record.last_seen)
        .ok_or_else(|| format!("last_seen {} out of range", record.last_seen))?;
    NamedEntity::new(kind, key, record.name, first_seen, last_seen).map_err(|e| e.to_string())
}

/// RFC 3339, or a naive ISO-8601 timestamp read as UTC.
fn parse_last_updated(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc).trunc_subsecs(6));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().trunc_subsecs(6))
}
