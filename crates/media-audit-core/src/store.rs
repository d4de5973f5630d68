use anyhow::Result;
use media_audit_models::Snapshot;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Persistence seam for the audit result set. The engine only ever deals
/// with the most recent snapshot: load whatever is there, or replace it
/// wholesale.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<Snapshot>>;
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Single JSON document on disk.
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            debug!("No persisted snapshot at {:?}", self.path);
            return Ok(None);
        }

        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Snapshot>(&content) {
                Ok(snapshot) => {
                    info!(
                        "Loaded snapshot from {:?} ({} items)",
                        self.path,
                        snapshot.content.len()
                    );
                    Ok(Some(snapshot))
                }
                Err(e) => {
                    warn!("Snapshot at {:?} is corrupt: {}. Ignoring it.", self.path, e);
                    Ok(None)
                }
            },
            Err(e) => {
                warn!("Failed to read snapshot at {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(snapshot)?;

        // Write to a sibling file and rename so a concurrent reader never
        // observes a partially written snapshot.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!(
            "Saved snapshot to {:?} ({} items)",
            self.path,
            snapshot.content.len()
        );
        Ok(())
    }
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct MemorySnapshotStore {
    inner: Mutex<Option<Snapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot store lock poisoned"))?
            .clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot store lock poisoned"))? = Some(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            timestamp: Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
            content: Vec::new(),
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("snapshot.json"));

        assert!(store.load().unwrap().is_none());

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_file_store_replaces_prior_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("snapshot.json"));

        store.save(&sample_snapshot()).unwrap();

        let newer = Snapshot {
            timestamp: Utc.with_ymd_and_hms(2026, 5, 2, 0, 0, 0).unwrap(),
            content: Vec::new(),
        };
        store.save(&newer).unwrap();
        assert_eq!(store.load().unwrap(), Some(newer));
    }

    #[test]
    fn test_corrupt_snapshot_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = FileSnapshotStore::new(path);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySnapshotStore::new();
        assert!(store.load().unwrap().is_none());

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }
}
