//! Metadata store for backup and snapshot records
//!
//! The store is append-only. Each kind of record is one list, returned in
//! append order (oldest first). Appends serialize so that concurrent backups
//! never lose a record, and a read right after an append sees it.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{RestorePointError, RestorePointResult};
use crate::models::{BackupRecord, SnapshotRecord};

use super::file_io::{read_json, write_json_atomic, FileLock};

/// Durable list of backup and snapshot records
pub trait MetadataStore: Send + Sync {
    /// All backup records, oldest first
    fn load_backups(&self) -> RestorePointResult<Vec<BackupRecord>>;

    /// Append a backup record; its id must be new
    fn append_backup(&self, record: &BackupRecord) -> RestorePointResult<()>;

    /// All snapshot records, oldest first
    fn load_snapshots(&self) -> RestorePointResult<Vec<SnapshotRecord>>;

    /// Append a snapshot record; its id must be new
    fn append_snapshot(&self, record: &SnapshotRecord) -> RestorePointResult<()>;

    /// Look up a backup by id
    fn find_backup(&self, id: &str) -> RestorePointResult<Option<BackupRecord>> {
        Ok(self.load_backups()?.into_iter().find(|r| r.id == id))
    }

    /// Look up a snapshot by id
    fn find_snapshot(&self, id: &str) -> RestorePointResult<Option<SnapshotRecord>> {
        Ok(self.load_snapshots()?.into_iter().find(|r| r.id == id))
    }

    /// The backup with the greatest timestamp, of any type
    fn latest_backup(&self) -> RestorePointResult<Option<BackupRecord>> {
        Ok(self
            .load_backups()?
            .into_iter()
            .max_by(|a, b| a.timestamp.cmp(&b.timestamp)))
    }
}

fn duplicate(entity_type: &'static str, id: &str) -> RestorePointError {
    RestorePointError::Duplicate {
        entity_type,
        identifier: id.to_string(),
    }
}

/// Store that keeps each list in a JSON array file
///
/// Every append re-reads and rewrites the whole list while holding an
/// exclusive lock on `lock_path`, so appends from other threads and other
/// processes using the same files serialize. The rewrite is atomic, so a
/// crash leaves either the old or the new list.
pub struct JsonMetadataStore {
    backups_path: PathBuf,
    snapshots_path: PathBuf,
    lock_path: PathBuf,
}

impl JsonMetadataStore {
    /// Create a store over the two list files and their shared lock file
    pub fn new(backups_path: PathBuf, snapshots_path: PathBuf, lock_path: PathBuf) -> Self {
        Self {
            backups_path,
            snapshots_path,
            lock_path,
        }
    }

    fn lock(&self) -> RestorePointResult<FileLock> {
        FileLock::acquire(&self.lock_path)
    }
}

impl MetadataStore for JsonMetadataStore {
    fn load_backups(&self) -> RestorePointResult<Vec<BackupRecord>> {
        read_json(&self.backups_path)
    }

    fn append_backup(&self, record: &BackupRecord) -> RestorePointResult<()> {
        let _guard = self.lock()?;

        let mut records: Vec<BackupRecord> = read_json(&self.backups_path)?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(duplicate("Backup", &record.id));
        }
        records.push(record.clone());
        write_json_atomic(&self.backups_path, &records)
    }

    fn load_snapshots(&self) -> RestorePointResult<Vec<SnapshotRecord>> {
        read_json(&self.snapshots_path)
    }

    fn append_snapshot(&self, record: &SnapshotRecord) -> RestorePointResult<()> {
        let _guard = self.lock()?;

        let mut records: Vec<SnapshotRecord> = read_json(&self.snapshots_path)?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(duplicate("Snapshot", &record.id));
        }
        records.push(record.clone());
        write_json_atomic(&self.snapshots_path, &records)
    }
}

/// Store that keeps records in memory only
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    backups: RwLock<Vec<BackupRecord>>,
    snapshots: RwLock<Vec<SnapshotRecord>>,
}

impl InMemoryMetadataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn load_backups(&self) -> RestorePointResult<Vec<BackupRecord>> {
        let backups = self.backups.read().map_err(|e| {
            RestorePointError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(backups.clone())
    }

    fn append_backup(&self, record: &BackupRecord) -> RestorePointResult<()> {
        let mut backups = self.backups.write().map_err(|e| {
            RestorePointError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        if backups.iter().any(|r| r.id == record.id) {
            return Err(duplicate("Backup", &record.id));
        }
        backups.push(record.clone());
        Ok(())
    }

    fn load_snapshots(&self) -> RestorePointResult<Vec<SnapshotRecord>> {
        let snapshots = self.snapshots.read().map_err(|e| {
            RestorePointError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(snapshots.clone())
    }

    fn append_snapshot(&self, record: &SnapshotRecord) -> RestorePointResult<()> {
        let mut snapshots = self.snapshots.write().map_err(|e| {
            RestorePointError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        if snapshots.iter().any(|r| r.id == record.id) {
            return Err(duplicate("Snapshot", &record.id));
        }
        snapshots.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BackupType;
    use chrono::{DateTime, Utc};
    use tempfile::TempDir;

    fn backup(id: &str, millis: i64) -> BackupRecord {
        BackupRecord {
            id: id.to_string(),
            timestamp: DateTime::<Utc>::from_timestamp_millis(millis).unwrap(),
            backup_type: BackupType::Full,
            size: 0,
            checksum: String::new(),
            included_files: Vec::new(),
            has_environment_snapshot: false,
            path: PathBuf::from("/backups").join(id),
        }
    }

    fn snapshot(id: &str, backup_id: &str) -> SnapshotRecord {
        SnapshotRecord {
            id: id.to_string(),
            label: "label".into(),
            timestamp: Utc::now(),
            backup_id: backup_id.to_string(),
            description: SnapshotRecord::describe("label"),
        }
    }

    fn json_store(temp_dir: &TempDir) -> JsonMetadataStore {
        JsonMetadataStore::new(
            temp_dir.path().join("backups.json"),
            temp_dir.path().join("snapshots.json"),
            temp_dir.path().join("metadata.lock"),
        )
    }

    #[test]
    fn test_empty_store_loads_empty_lists() {
        let temp_dir = TempDir::new().unwrap();
        let store = json_store(&temp_dir);

        assert!(store.load_backups().unwrap().is_empty());
        assert!(store.load_snapshots().unwrap().is_empty());
        assert!(store.latest_backup().unwrap().is_none());
    }

    #[test]
    fn test_append_is_visible_and_ordered() {
        let temp_dir = TempDir::new().unwrap();
        let store = json_store(&temp_dir);

        store.append_backup(&backup("full-1", 1)).unwrap();
        store.append_backup(&backup("incremental-2", 2)).unwrap();

        let ids: Vec<_> = store.load_backups().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["full-1", "incremental-2"]);
        assert_eq!(store.find_backup("full-1").unwrap().unwrap().id, "full-1");
        assert!(store.find_backup("missing").unwrap().is_none());
    }

    #[test]
    fn test_records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        json_store(&temp_dir).append_backup(&backup("full-1", 1)).unwrap();
        json_store(&temp_dir)
            .append_snapshot(&snapshot("snapshot-2", "full-1"))
            .unwrap();

        let reopened = json_store(&temp_dir);
        assert_eq!(reopened.load_backups().unwrap().len(), 1);
        assert_eq!(
            reopened.find_snapshot("snapshot-2").unwrap().unwrap().backup_id,
            "full-1"
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = json_store(&temp_dir);
        store.append_backup(&backup("full-1", 1)).unwrap();

        let err = store.append_backup(&backup("full-1", 1)).unwrap_err();
        assert!(matches!(err, RestorePointError::Duplicate { .. }));
        assert_eq!(store.load_backups().unwrap().len(), 1);

        let memory = InMemoryMetadataStore::new();
        memory.append_snapshot(&snapshot("snapshot-1", "full-1")).unwrap();
        assert!(memory.append_snapshot(&snapshot("snapshot-1", "full-1")).is_err());
    }

    #[test]
    fn test_latest_backup_uses_timestamp() {
        let store = InMemoryMetadataStore::new();
        store.append_backup(&backup("full-30", 30)).unwrap();
        store.append_backup(&backup("incremental-10", 10)).unwrap();

        assert_eq!(store.latest_backup().unwrap().unwrap().id, "full-30");
    }

    #[test]
    fn test_concurrent_appends_keep_every_record() {
        let temp_dir = TempDir::new().unwrap();

        // One store per thread, as separate invocations would each open their own
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = json_store(&temp_dir);
                std::thread::spawn(move || {
                    for i in 0..10 {
                        let millis = t * 100 + i;
                        store
                            .append_backup(&backup(&format!("full-{}", millis), millis))
                            .unwrap();
                        store
                            .append_snapshot(&snapshot(&format!("snapshot-{}", millis), "full-0"))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let store = json_store(&temp_dir);
        assert_eq!(store.load_backups().unwrap().len(), 80);
        assert_eq!(store.load_snapshots().unwrap().len(), 80);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("backups.json"), "not json").unwrap();

        let store = json_store(&temp_dir);
        assert!(store.load_backups().is_err());
        assert!(store.find_backup("full-1").is_err());
    }
}
