//! Bounded, disk-persisted snapshot sequence

use crate::data::Snapshot;
use crate::error::StoreError;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Snapshot store backed by a JSON array file.
///
/// The sequence is held newest-first, as on disk, and never exceeds
/// `capacity`. Every append rewrites the whole file through a temp file
/// and a rename, so the file on disk is always either the previous or the
/// new sequence.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    capacity: usize,
    snapshots: Vec<Snapshot>,
}

impl SnapshotStore {
    /// Open the store, loading whatever is persisted at `path`
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let snapshots = Self::load(&path, capacity);
        Self {
            path,
            capacity,
            snapshots,
        }
    }

    /// Read a persisted sequence. Missing or corrupt files yield an empty
    /// sequence; a corrupt file is moved aside to `<file>.corrupt`.
    pub fn load(path: &Path, capacity: usize) -> Vec<Snapshot> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No snapshot file at {}, starting empty", path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read snapshot file {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Snapshot>>(&content) {
            Ok(mut snapshots) => {
                snapshots.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                snapshots.truncate(capacity);
                info!("Loaded {} snapshots from {}", snapshots.len(), path.display());
                snapshots
            }
            Err(e) => {
                let aside = corrupt_path(path);
                warn!(
                    "Snapshot file {} is corrupt ({}), moving it to {} and starting empty",
                    path.display(),
                    e,
                    aside.display()
                );
                if let Err(e) = fs::rename(path, &aside) {
                    warn!("Failed to move corrupt snapshot file aside: {}", e);
                }
                Vec::new()
            }
        }
    }

    /// Insert a snapshot at its timestamp position, evict the oldest beyond
    /// capacity, persist.
    ///
    /// A snapshot older than everything kept in a full store is dropped.
    /// The in-memory sequence is updated even when the write fails.
    pub fn append(&mut self, snapshot: Snapshot) -> Result<&[Snapshot], StoreError> {
        let at = self
            .snapshots
            .partition_point(|kept| kept.timestamp >= snapshot.timestamp);
        if at >= self.capacity {
            debug!("Dropping snapshot at {}, older than the kept window", snapshot.timestamp);
        }
        self.snapshots.insert(at, snapshot);
        self.snapshots.truncate(self.capacity);
        self.persist()?;
        Ok(&self.snapshots)
    }

    /// Newest-first view
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Oldest-first copy, for computation
    pub fn chronological(&self) -> Vec<Snapshot> {
        self.snapshots.iter().rev().cloned().collect()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let body = serde_json::to_vec_pretty(&self.snapshots)?;
        let tmp_path = suffixed(&self.path, ".tmp");
        fs::write(&tmp_path, body).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn corrupt_path(path: &Path) -> PathBuf {
    suffixed(path, ".corrupt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn tick(minute: i64, price: f64) -> Snapshot {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Snapshot::tick(base + Duration::minutes(minute), price, price - 1.0, price + 1.0, 1.0)
    }

    #[test]
    fn append_evicts_oldest_at_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SnapshotStore::open(dir.path().join("cache.json"), 3);

        for i in 0..5 {
            store.append(tick(i, 100.0 + i as f64)).unwrap();
        }

        let kept: Vec<f64> = store.snapshots().iter().map(|s| s.close()).collect();
        assert_eq!(kept, vec![104.0, 103.0, 102.0]);
        assert_eq!(store.latest().map(|s| s.close()), Some(104.0));

        let ascending: Vec<f64> = store.chronological().iter().map(|s| s.close()).collect();
        assert_eq!(ascending, vec![102.0, 103.0, 104.0]);
    }

    #[test]
    fn missing_file_starts_empty_and_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("cache.json");
        let mut store = SnapshotStore::open(&path, 10);
        assert!(store.is_empty());

        store.append(tick(0, 1.0)).unwrap();
        assert!(path.exists());
        assert!(!suffixed(&path, ".tmp").exists());
    }

    #[test]
    fn corrupt_file_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "[{\"timestamp\": ").unwrap();

        let store = SnapshotStore::open(&path, 10);
        assert!(store.is_empty());
        assert!(!path.exists());
        assert!(corrupt_path(&path).exists());
    }

    #[test]
    fn oversized_file_is_truncated_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let mut big = SnapshotStore::open(&path, 10);
        for i in 0..10 {
            big.append(tick(i, i as f64)).unwrap();
        }

        let small = SnapshotStore::open(&path, 4);
        let kept: Vec<f64> = small.snapshots().iter().map(|s| s.close()).collect();
        assert_eq!(kept, vec![9.0, 8.0, 7.0, 6.0]);
    }

    #[test]
    fn late_snapshot_is_placed_by_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let mut store = SnapshotStore::open(&path, 3);
        for i in [10, 12, 11] {
            store.append(tick(i, i as f64)).unwrap();
        }
        let kept: Vec<f64> = store.snapshots().iter().map(|s| s.close()).collect();
        assert_eq!(kept, vec![12.0, 11.0, 10.0]);

        // older than the whole full window: dropped
        store.append(tick(5, 5.0)).unwrap();
        let kept: Vec<f64> = store.snapshots().iter().map(|s| s.close()).collect();
        assert_eq!(kept, vec![12.0, 11.0, 10.0]);

        let reopened = SnapshotStore::open(&path, 3);
        assert_eq!(reopened.snapshots(), store.snapshots());
    }
}
