// ── Cache snapshot ──
//
// The complete cache state and the unit of atomic persistence. All
// mutation rules live here as plain methods so they can be tested
// without a store; `NameResolver` adds locking and persistence on top.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SubsecRound, Utc};

use super::entity::{self, EntityKind, NamedEntity, UNKNOWN};
use super::role::DeviceRole;
use crate::error::CoreError;

/// Role → device ids for one zone.
pub type ZoneRoles = BTreeMap<DeviceRole, BTreeSet<String>>;

/// Result of applying a name observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// First time this key was seen.
    Created,
    /// Same name as stored; only `last_seen` moved.
    Confirmed,
    /// Name conflict resolved by last-writer-wins.
    Updated { old_name: String, new_name: String },
}

impl Outcome {
    /// Whether this outcome changed anything worth writing to disk.
    ///
    /// `Confirmed` only moves `last_seen`, and is deliberately not persisted
    /// to keep steady message traffic from rewriting the file.
    pub fn requires_persist(&self) -> bool {
        !matches!(self, Self::Confirmed)
    }
}

/// All zones, devices and zone-role links known to the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    zones: BTreeMap<String, NamedEntity>,
    devices: BTreeMap<String, NamedEntity>,
    zone_roles: BTreeMap<String, ZoneRoles>,
    last_updated: Option<DateTime<Utc>>,
}

impl CacheSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty() && self.devices.is_empty() && self.zone_roles.is_empty()
    }

    // ── Read accessors ───────────────────────────────────────────────

    /// Entities of one kind, keyed and ordered by key.
    pub fn entities(&self, kind: EntityKind) -> &BTreeMap<String, NamedEntity> {
        match kind {
            EntityKind::Zone => &self.zones,
            EntityKind::Device => &self.devices,
        }
    }

    pub fn zones(&self) -> &BTreeMap<String, NamedEntity> {
        &self.zones
    }

    pub fn devices(&self) -> &BTreeMap<String, NamedEntity> {
        &self.devices
    }

    pub fn entity(&self, kind: EntityKind, key: &str) -> Option<&NamedEntity> {
        self.entities(kind).get(key)
    }

    /// Stored name, if any. Never allocates and never inserts.
    pub fn name_of(&self, kind: EntityKind, key: &str) -> Option<&str> {
        self.entity(kind, key).map(NamedEntity::name)
    }

    /// Stored name or the `"unknown"` sentinel.
    pub fn resolve(&self, kind: EntityKind, key: &str) -> &str {
        self.name_of(kind, key).unwrap_or(UNKNOWN)
    }

    pub fn zone_roles(&self) -> &BTreeMap<String, ZoneRoles> {
        &self.zone_roles
    }

    /// Devices recorded for one (zone, role) pair.
    pub fn devices_in(&self, zone_index: &str, role: DeviceRole) -> Option<&BTreeSet<String>> {
        self.zone_roles.get(zone_index)?.get(&role)
    }

    /// Total number of (zone, role, device) links.
    pub fn role_link_count(&self) -> usize {
        self.zone_roles
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeSet::len)
            .sum()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Apply a name observation: create, confirm, or overwrite.
    pub fn observe(
        &mut self,
        kind: EntityKind,
        key: &str,
        name: &str,
        seen: DateTime<Utc>,
    ) -> Result<Outcome, CoreError> {
        entity::validate(kind, key, name)?;

        let entities = match kind {
            EntityKind::Zone => &mut self.zones,
            EntityKind::Device => &mut self.devices,
        };

        let Some(existing) = entities.get_mut(key) else {
            let created = NamedEntity::first_observed(kind, key, name, seen)?;
            entities.insert(key.to_owned(), created);
            return Ok(Outcome::Created);
        };

        if existing.name() == name {
            existing.touch(seen);
            return Ok(Outcome::Confirmed);
        }

        let old_name = existing.rename(name.to_owned(), seen);
        Ok(Outcome::Updated {
            old_name,
            new_name: name.to_owned(),
        })
    }

    /// Record `device_id` under `(zone_index, role)`. Returns whether the
    /// set grew.
    pub fn observe_role(
        &mut self,
        zone_index: &str,
        role: DeviceRole,
        device_id: &str,
    ) -> Result<bool, CoreError> {
        validate_role_link(zone_index, device_id)?;

        let devices = self
            .zone_roles
            .entry(zone_index.to_owned())
            .or_default()
            .entry(role)
            .or_default();

        if devices.contains(device_id) {
            return Ok(false);
        }
        Ok(devices.insert(device_id.to_owned()))
    }

    pub(crate) fn set_last_updated(&mut self, at: DateTime<Utc>) {
        self.last_updated = Some(at.trunc_subsecs(6));
    }

    /// Insert an already-validated entity, replacing any entity with the
    /// same kind and key. Used when rebuilding a snapshot from disk.
    pub(crate) fn insert_entity(&mut self, entity: NamedEntity) {
        let entities = match entity.kind() {
            EntityKind::Zone => &mut self.zones,
            EntityKind::Device => &mut self.devices,
        };
        entities.insert(entity.key().to_owned(), entity);
    }
}

fn validate_role_link(zone_index: &str, device_id: &str) -> Result<(), CoreError> {
    let reason = if zone_index.trim().is_empty() || zone_index == UNKNOWN {
        "zone index is empty or unknown"
    } else if device_id.trim().is_empty() || device_id == UNKNOWN {
        "device id is empty or unknown"
    } else {
        return Ok(());
    };

    Err(CoreError::InvalidRoleObservation {
        zone_index: zone_index.to_owned(),
        reason: reason.to_owned(),
    })
}
