// ── Metric label provider ──
//
// Read-only queries that turn protocol identifiers into `zone_name` and
// `device_name` label values. Everything here works on one published
// snapshot, so a single scrape sees a consistent set of names.

use std::sync::Arc;

use serde::Serialize;

use crate::model::{CacheSnapshot, EntityKind, UNKNOWN};

/// Label values attached to a measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labels {
    pub device_name: String,
    pub zone_name: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            device_name: UNKNOWN.to_owned(),
            zone_name: UNKNOWN.to_owned(),
        }
    }
}

/// What a metrics emitter needs from the name cache.
pub trait LabelSource {
    /// Name for `key`, or `"unknown"`.
    fn resolve(&self, kind: EntityKind, key: &str) -> String;

    /// Labels for a measurement about `device_id` and/or `zone_index`.
    fn labels_for(&self, device_id: Option<&str>, zone_index: Option<&str>) -> Labels;
}

/// Label queries over one immutable snapshot.
#[derive(Debug, Clone)]
pub struct LabelView {
    snapshot: Arc<CacheSnapshot>,
}

impl LabelView {
    pub fn new(snapshot: Arc<CacheSnapshot>) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &CacheSnapshot {
        &self.snapshot
    }

    /// Stored name or `"unknown"`, borrowed from the snapshot.
    pub fn name(&self, kind: EntityKind, key: &str) -> &str {
        self.snapshot.resolve(kind, key)
    }

    /// Zone a device belongs to, derived from zone-role links.
    ///
    /// A device linked into several zones reports the lexicographically
    /// smallest zone index, independent of the order links were observed.
    pub fn zone_for_device(&self, device_id: &str) -> Option<&str> {
        if !is_known_key(device_id) {
            return None;
        }
        // zone_roles is ordered by zone index, so the first hit is the smallest.
        self.snapshot
            .zone_roles()
            .iter()
            .find(|(_, roles)| roles.values().any(|devices| devices.contains(device_id)))
            .map(|(zone, _)| zone.as_str())
    }

    /// Label values for a measurement. An explicit zone index wins over
    /// one derived from the device.
    pub fn labels_for(&self, device_id: Option<&str>, zone_index: Option<&str>) -> Labels {
        let device_id = device_id.filter(|id| is_known_key(id));
        let zone_index = zone_index
            .filter(|idx| is_known_key(idx))
            .or_else(|| device_id.and_then(|id| self.zone_for_device(id)));

        Labels {
            device_name: device_id
                .map_or(UNKNOWN, |id| self.name(EntityKind::Device, id))
                .to_owned(),
            zone_name: zone_index
                .map_or(UNKNOWN, |idx| self.name(EntityKind::Zone, idx))
                .to_owned(),
        }
    }

    /// `(zone_index, zone_name)` for every named zone.
    pub fn zone_infos(&self) -> impl Iterator<Item = (&str, &str)> {
        self.infos(EntityKind::Zone)
    }

    /// `(device_id, device_name)` for every named device.
    pub fn device_infos(&self) -> impl Iterator<Item = (&str, &str)> {
        self.infos(EntityKind::Device)
    }

    fn infos(&self, kind: EntityKind) -> impl Iterator<Item = (&str, &str)> {
        self.snapshot
            .entities(kind)
            .iter()
            .map(|(key, entity)| (key.as_str(), entity.name()))
    }
}

impl LabelSource for LabelView {
    fn resolve(&self, kind: EntityKind, key: &str) -> String {
        self.name(kind, key).to_owned()
    }

    fn labels_for(&self, device_id: Option<&str>, zone_index: Option<&str>) -> Labels {
        LabelView::labels_for(self, device_id, zone_index)
    }
}

fn is_known_key(key: &str) -> bool {
    !key.trim().is_empty() && key != UNKNOWN
}
