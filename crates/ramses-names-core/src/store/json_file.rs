// ── JSON file store ──
//
// Writes go to a temporary file in the destination directory, are
// flushed and synced, then renamed over the canonical path. A reader,
// including a restarted process, sees the old file or the new one and
// never a partial write.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use super::SnapshotStore;
use super::document::SnapshotDocument;
use crate::error::StoreError;
use crate::model::CacheSnapshot;

/// Cache file path used by the original exporter; kept so existing caches
/// carry over.
pub const DEFAULT_CACHE_FILE: &str = "/tmp/ramses_rf_cache.json";

const TEMP_SUFFIX: &str = ".tmp";

/// Snapshot store backed by a single JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the cache file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn try_load(&self) -> Result<Option<CacheSnapshot>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let doc: SnapshotDocument =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(doc.into_snapshot()))
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    fn temp_prefix(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| ".cache.".to_owned(), |n| format!(".{}.", n.to_string_lossy()))
    }

    fn temp_file(&self, dir: &Path) -> io::Result<NamedTempFile> {
        tempfile::Builder::new()
            .prefix(&self.temp_prefix())
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)
    }

    /// Remove temp files left behind by a save that never reached its
    /// rename. Must run before this save creates its own temp file.
    fn sweep_stale_temp_files(&self, dir: &Path) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        let prefix = self.temp_prefix();
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !(name.starts_with(&prefix) && name.ends_with(TEMP_SUFFIX)) {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => debug!(file = %name, "removed stale temp file"),
                Err(e) => warn!(file = %name, error = %e, "could not remove stale temp file"),
            }
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> CacheSnapshot {
        match self.try_load() {
            Ok(Some(snap)) => {
                info!(
                    path = %self.path.display(),
                    zones = snap.zones().len(),
                    devices = snap.devices().len(),
                    role_links = snap.role_link_count(),
                    "loaded name cache"
                );
                if !snap.zones().is_empty() {
                    info!(zones = ?snap.zones().keys().collect::<Vec<_>>(), "cached zones");
                }
                if !snap.devices().is_empty() {
                    info!(devices = ?snap.devices().keys().collect::<Vec<_>>(), "cached devices");
                }
                snap
            }
            Ok(None) => {
                info!(
                    path = %self.path.display(),
                    "no cache file found, starting with empty cache"
                );
                CacheSnapshot::new()
            }
            Err(e) => {
                error!(error = %e, "failed to load name cache, starting with empty cache");
                CacheSnapshot::new()
            }
        }
    }

    fn save(&self, snapshot: &CacheSnapshot) -> Result<(), StoreError> {
        let doc = SnapshotDocument::from(snapshot);
        let json = serde_json::to_vec_pretty(&doc)?;

        let dir = self.directory();
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        self.sweep_stale_temp_files(dir);

        let mut tmp = self.temp_file(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(&json)
            .and_then(|()| tmp.flush())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StoreError::io(tmp.path(), e))?;

        tmp.persist(&self.path).map_err(|e| StoreError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;
        sync_directory(dir);

        debug!(
            path = %self.path.display(),
            zones = snapshot.zones().len(),
            devices = snapshot.devices().len(),
            "saved name cache"
        );
        Ok(())
    }
}

/// Make the rename itself durable. Failure here only weakens durability
/// across power loss, so it is not reported.
#[cfg(unix)]
fn sync_directory(dir: &Path) {
    if let Ok(handle) = fs::File::open(dir) {
        let _ = handle.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_directory(_dir: &Path) {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{DeviceRole, EntityKind};
    use chrono::{TimeZone, Utc};

    #[test]
    fn missing_file_is_cold_start() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cache.json"));

        assert!(store.try_load().unwrap().is_none());
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/deeper/cache.json"));

        let mut snap = CacheSnapshot::new();
        snap.observe(EntityKind::Zone, "01", "Lounge", Utc.timestamp_opt(1, 0).unwrap())
            .unwrap();
        store.save(&snap).unwrap();

        assert!(store.path().exists());
    }

    #[test]
    fn save_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cache.json"));

        let mut snap = CacheSnapshot::new();
        snap.observe_role("01", DeviceRole::ZoneActuator, "04:000001").unwrap();
        store.save(&snap).unwrap();
        store.save(&snap).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["cache.json".to_owned()]);
    }

    #[test]
    fn document_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cache.json"));
        store.save(&CacheSnapshot::new()).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("{\n  \"zones\""), "unexpected layout:\n{text}");
    }
}
