// ── Name resolver cache ──
//
// Authoritative in-memory name cache. Writers are serialized by a mutex
// and publish a fresh snapshot through `ArcSwap`; readers load the current
// `Arc` without locking, so a scrape never sees a half-applied change and
// never waits on ingestion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info, trace, warn};

use crate::error::CoreError;
use crate::labels::{LabelSource, LabelView, Labels};
use crate::model::{Applied, CacheSnapshot, DeviceRole, EntityKind, Observation, Outcome};
use crate::store::{JsonFileStore, SnapshotStore};

/// Counters describing the cache and its persistence history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    pub zones: usize,
    pub devices: usize,
    pub role_links: usize,
    pub saves: u64,
    pub save_failures: u64,
}

/// Maps zone indices and device ids to operator-assigned names.
///
/// Owned by the process's composition root and shared by reference (or
/// `Arc`) between the ingestion path and the scrape path. Every change is
/// saved through the store before the mutating call returns, so there is
/// nothing to flush on shutdown.
pub struct NameResolver<S = JsonFileStore> {
    state: ArcSwap<CacheSnapshot>,
    writer: Mutex<()>,
    store: S,
    version: watch::Sender<u64>,
    saves: AtomicU64,
    save_failures: AtomicU64,
}

impl<S: SnapshotStore> NameResolver<S> {
    /// Load the store's snapshot and start serving it.
    pub fn open(store: S) -> Self {
        let initial = store.load();
        let (version, _) = watch::channel(0);

        Self {
            state: ArcSwap::from_pointee(initial),
            writer: Mutex::new(()),
            store,
            version,
            saves: AtomicU64::new(0),
            save_failures: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Mutations (ingestion path) ───────────────────────────────────

    /// Record that `key` carries `name` as of `seen`.
    ///
    /// `Created` and `Updated` outcomes are persisted; `Confirmed` only
    /// moves `last_seen` in memory.
    pub fn observe(
        &self,
        kind: EntityKind,
        key: &str,
        name: &str,
        seen: DateTime<Utc>,
    ) -> Result<Outcome, CoreError> {
        let outcome = self.mutate(
            |snap| snap.observe(kind, key, name, seen),
            Outcome::requires_persist,
        )?;

        match &outcome {
            Outcome::Created => info!(%kind, key, name, "discovered new {kind}"),
            Outcome::Confirmed => trace!(%kind, key, "name confirmed"),
            Outcome::Updated { old_name, new_name } => warn!(
                %kind,
                key,
                old_name = %old_name,
                new_name = %new_name,
                "{kind} name changed, updating cache"
            ),
        }
        Ok(outcome)
    }

    /// Record `device_id` under `role` in `zone_index`. Returns whether
    /// the link is new.
    pub fn observe_role(
        &self,
        zone_index: &str,
        role: DeviceRole,
        device_id: &str,
        seen: DateTime<Utc>,
    ) -> Result<bool, CoreError> {
        let changed = self.mutate(
            |snap| snap.observe_role(zone_index, role, device_id),
            |changed| *changed,
        )?;

        if changed {
            debug!(zone = zone_index, %role, device = device_id, %seen, "recorded zone device");
        }
        Ok(changed)
    }

    /// Record every device of one zone-devices message. An invalid id
    /// discards the whole batch, and the result is saved at most once.
    /// Returns the number of new links.
    pub fn observe_roles<I>(
        &self,
        zone_index: &str,
        role: DeviceRole,
        device_ids: &[I],
        seen: DateTime<Utc>,
    ) -> Result<usize, CoreError>
    where
        I: AsRef<str>,
    {
        let added = self.mutate(
            |snap| {
                let mut added = 0;
                for id in device_ids {
                    if snap.observe_role(zone_index, role, id.as_ref())? {
                        added += 1;
                    }
                }
                Ok(added)
            },
            |added| *added > 0,
        )?;

        if added > 0 {
            debug!(zone = zone_index, %role, added, %seen, "recorded zone devices");
        }
        Ok(added)
    }

    /// Apply one event from the ingestion adapter.
    pub fn apply(&self, observation: &Observation) -> Result<Applied, CoreError> {
        match observation {
            Observation::ZoneNameObserved { zone_index, name, ts } => self
                .observe(EntityKind::Zone, zone_index, name, *ts)
                .map(Applied::Name),
            Observation::DeviceNameObserved { device_id, name, ts } => self
                .observe(EntityKind::Device, device_id, name, *ts)
                .map(Applied::Name),
            Observation::ZoneDeviceRoleObserved {
                zone_index,
                role,
                device_id,
                ts,
            } => self
                .observe_role(zone_index, *role, device_id, *ts)
                .map(|changed| Applied::Role { changed }),
        }
    }

    // ── Reads (scrape path) ──────────────────────────────────────────

    /// Name for `key`, or `"unknown"`. Never creates an entry.
    pub fn resolve(&self, kind: EntityKind, key: &str) -> String {
        self.state.load().resolve(kind, key).to_owned()
    }

    /// Current point-in-time snapshot.
    pub fn snapshot(&self) -> Arc<CacheSnapshot> {
        self.state.load_full()
    }

    /// Label query surface over the current snapshot.
    pub fn labels(&self) -> LabelView {
        LabelView::new(self.snapshot())
    }

    pub fn stats(&self) -> ResolverStats {
        let snap = self.state.load();
        ResolverStats {
            zones: snap.zones().len(),
            devices: snap.devices().len(),
            role_links: snap.role_link_count(),
            saves: self.saves.load(Ordering::Relaxed),
            save_failures: self.save_failures.load(Ordering::Relaxed),
        }
    }

    /// Version counter bumped on every change that was (or should have
    /// been) persisted.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Apply `change` to a copy of the current snapshot and publish it.
    /// When `changed` says so, bump the version and save.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut CacheSnapshot) -> Result<T, CoreError>,
        changed: impl FnOnce(&T) -> bool,
    ) -> Result<T, CoreError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = CacheSnapshot::clone(&self.state.load());
        let result = change(&mut next)?;
        let changed = changed(&result);
        if changed {
            next.set_last_updated(Utc::now());
        }

        let next = Arc::new(next);
        self.state.store(Arc::clone(&next));

        if changed {
            self.version.send_modify(|v| *v += 1);
            self.persist(&next);
        }
        Ok(result)
    }

    fn persist(&self, snapshot: &CacheSnapshot) {
        match self.store.save(snapshot) {
            Ok(()) => {
                self.saves.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.save_failures.fetch_add(1, Ordering::Relaxed);
                error!(error = %e, "failed to save name cache, keeping in-memory state");
            }
        }
    }
}

impl<S: SnapshotStore> LabelSource for NameResolver<S> {
    fn resolve(&self, kind: EntityKind, key: &str) -> String {
        NameResolver::resolve(self, kind, key)
    }

    fn labels_for(&self, device_id: Option<&str>, zone_index: Option<&str>) -> Labels {
        self.labels().labels_for(device_id, zone_index)
    }
}
