//! Backup creation
//!
//! A backup copies the selected files into `<backup-root>/<id>/`, checksums
//! what was actually copied and appends a record to the metadata store.
//! Creation is best-effort: a file that cannot be copied is left out of the
//! record, and a working tree that cannot be listed yields an empty backup.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use crate::error::RestorePointResult;
use crate::models::ids::record_id;
use crate::models::{BackupRecord, BackupType, FileFailure};

use super::checksum::{compute_checksum, FileContent};
use super::context::{join_relative, BackupContext};

/// Everything produced by one backup run
#[derive(Debug)]
pub struct BackupOutcome {
    /// The record, also appended to the store when `persisted` is `Ok`
    pub record: BackupRecord,
    /// Files that were selected but could not be copied
    pub failures: Vec<FileFailure>,
    /// Result of appending the record to the metadata store
    pub persisted: RestorePointResult<()>,
}

/// Creates full and incremental backups
pub struct BackupEngine {
    ctx: BackupContext,
}

impl BackupEngine {
    /// Create a new BackupEngine
    pub fn new(ctx: BackupContext) -> Self {
        Self { ctx }
    }

    /// Back up every enumerated file
    pub fn create_full_backup(&self) -> BackupRecord {
        self.run(BackupType::Full).record
    }

    /// Back up files modified after the most recent backup
    ///
    /// With no prior backup every file qualifies.
    pub fn create_incremental_backup(&self) -> BackupRecord {
        self.run(BackupType::Incremental).record
    }

    /// All backup records, oldest first
    pub fn list_backups(&self) -> Vec<BackupRecord> {
        self.ctx.store.load_backups().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load backup records");
            Vec::new()
        })
    }

    /// Run a backup and report per-file failures alongside the record
    pub fn run(&self, backup_type: BackupType) -> BackupOutcome {
        // Wall-clock start; the next incremental compares modification times to it
        let timestamp = Utc::now();
        let (id, reserved) = self.reserve_id(backup_type, timestamp);
        let backup_path = self.ctx.paths.backup_path(&id);

        let mut candidates = self.enumerate();
        candidates.sort();
        candidates.dedup();

        if backup_type == BackupType::Incremental {
            candidates = self.modified_since_last_backup(candidates);
        }

        if let Err(e) = reserved {
            tracing::warn!(path = %backup_path.display(), error = %e, "Failed to create backup directory");
        }

        let mut failures = Vec::new();
        let mut copied = Vec::new();
        for relative in candidates {
            match self.copy_into_backup(&backup_path, &relative) {
                Ok(()) => copied.push(relative),
                Err(error) => {
                    tracing::warn!(path = %relative, %error, "Skipping file that could not be backed up");
                    failures.push(FileFailure {
                        path: relative,
                        error,
                    });
                }
            }
        }

        // Checksum only after every copy is accounted for, over the copies on disk
        let mut contents = Vec::with_capacity(copied.len());
        for relative in copied {
            let read = join_relative(&backup_path, &relative)
                .map_err(|e| e.to_string())
                .and_then(|path| self.ctx.fs.read(&path).map_err(|e| e.to_string()));
            match read {
                Ok(content) => contents.push(FileContent::new(relative, content)),
                Err(error) => {
                    tracing::warn!(path = %relative, %error, "Dropping file whose backup copy cannot be read");
                    failures.push(FileFailure {
                        path: relative,
                        error,
                    });
                }
            }
        }

        let checksum = compute_checksum(&contents);
        let size = contents.iter().map(|f| f.content.len() as u64).sum();
        let included_files = contents.into_iter().map(|f| f.path).collect::<Vec<_>>();
        let has_environment_snapshot = self.capture_environment(&id);

        let record = BackupRecord {
            id,
            timestamp,
            backup_type,
            size,
            checksum,
            included_files,
            has_environment_snapshot,
            path: backup_path,
        };

        let persisted = self.ctx.store.append_backup(&record);
        match &persisted {
            Ok(()) => tracing::info!(
                id = %record.id,
                kind = %record.backup_type,
                files = record.included_files.len(),
                failed = failures.len(),
                bytes = record.size,
                "Backup created"
            ),
            Err(e) => {
                tracing::error!(id = %record.id, error = %e, "Failed to record backup");
                self.discard_copies(&record);
            }
        }

        BackupOutcome {
            record,
            failures,
            persisted,
        }
    }

    /// Pick an unused id and claim `<backup-root>/<id>/` for it
    ///
    /// Creating the directory is exclusive, so another process backing up
    /// into the same state directory can never share it.
    fn reserve_id(&self, backup_type: BackupType, now: DateTime<Utc>) -> (String, std::io::Result<()>) {
        let prefix = backup_type.id_prefix();
        let taken: HashSet<String> = self
            .ctx
            .store
            .load_backups()
            .map(|records| records.into_iter().map(|r| r.id).collect())
            .unwrap_or_default();

        if let Err(e) = self.ctx.fs.create_dir_all(&self.ctx.paths.backup_dir()) {
            let millis = self.ctx.ids.next_millis(now, |m| taken.contains(&record_id(prefix, m)));
            return (record_id(prefix, millis), Err(e));
        }

        loop {
            let millis = self.ctx.ids.next_millis(now, |m| taken.contains(&record_id(prefix, m)));
            let id = record_id(prefix, millis);
            match self.ctx.fs.create_dir(&self.ctx.paths.backup_path(&id)) {
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                result => return (id, result),
            }
        }
    }

    fn enumerate(&self) -> Vec<String> {
        let root = self.ctx.paths.project_root();
        self.ctx
            .enumerator
            .enumerate(root, &self.ctx.settings.include_patterns)
            .unwrap_or_else(|e| {
                tracing::warn!(root = %root.display(), error = %e, "File enumeration failed; backing up nothing");
                Vec::new()
            })
    }

    fn modified_since_last_backup(&self, candidates: Vec<String>) -> Vec<String> {
        let reference = match self.ctx.store.latest_backup() {
            Ok(Some(latest)) => latest.timestamp,
            Ok(None) => return candidates,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot read previous backups; including every file");
                return candidates;
            }
        };

        let root = self.ctx.paths.project_root();
        candidates
            .into_iter()
            .filter(|relative| {
                let stat = join_relative(root, relative)
                    .map_err(|e| e.to_string())
                    .and_then(|path| self.ctx.fs.stat(&path).map_err(|e| e.to_string()));
                match stat {
                    Ok(stat) => stat.modified > reference,
                    Err(error) => {
                        // Unknown mtime: keep it and let the copy decide
                        tracing::warn!(path = %relative, %error, "Cannot stat file; including it");
                        true
                    }
                }
            })
            .collect()
    }

    fn copy_into_backup(&self, backup_path: &std::path::Path, relative: &str) -> Result<(), String> {
        let source = join_relative(self.ctx.paths.project_root(), relative).map_err(|e| e.to_string())?;
        let target = join_relative(backup_path, relative).map_err(|e| e.to_string())?;

        if let Some(parent) = target.parent() {
            self.ctx.fs.create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        self.ctx.fs.copy(&source, &target).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Remove the copies of a backup whose record could not be stored
    fn discard_copies(&self, record: &BackupRecord) {
        let fs = &self.ctx.fs;
        if fs.exists(&record.path) {
            if let Err(e) = fs.remove_dir_all(&record.path) {
                tracing::warn!(path = %record.path.display(), error = %e, "Orphaned backup directory left on disk");
            }
        }

        if record.has_environment_snapshot {
            let env_file = self.ctx.paths.environment_file(&record.id);
            if let Err(e) = fs.remove_file(&env_file) {
                tracing::warn!(path = %env_file.display(), error = %e, "Orphaned environment capture left on disk");
            }
        }
    }

    fn capture_environment(&self, id: &str) -> bool {
        let keys = &self.ctx.settings.environment_keys;
        if keys.is_empty() {
            return false;
        }

        let captured: BTreeMap<&str, String> = keys
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (key.as_str(), value)))
            .collect();

        let json = match serde_json::to_vec_pretty(&captured) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize environment capture");
                return false;
            }
        };

        let path = self.ctx.paths.environment_file(id);
        match self.ctx.fs.write(&path, &json) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to write environment capture");
                false
            }
        }
    }
}
