//! Single entry point over the backup components

use std::sync::Arc;

use crate::config::{RestorePointPaths, Settings};
use crate::error::RestorePointResult;
use crate::models::{BackupRecord, RestoreResult, SnapshotRecord, ValidationResult};

use super::context::BackupContext;
use super::engine::BackupEngine;
use super::restore::RestoreManager;
use super::snapshot::SnapshotManager;
use super::validate::Validator;

/// Backup, snapshot, validation and restore over one shared context
pub struct BackupService {
    engine: Arc<BackupEngine>,
    snapshots: SnapshotManager,
    validator: Validator,
    restore: RestoreManager,
}

impl BackupService {
    /// Wire every component to the same context
    pub fn new(ctx: BackupContext) -> Self {
        let engine = Arc::new(BackupEngine::new(ctx.clone()));
        let validator = Validator::new(ctx.clone());
        let snapshots = SnapshotManager::new(ctx.clone(), Arc::clone(&engine));
        let restore = RestoreManager::new(ctx, validator.clone());

        Self {
            engine,
            snapshots,
            validator,
            restore,
        }
    }

    /// Service over the host filesystem with JSON metadata in the state directory
    pub fn open(paths: RestorePointPaths, settings: Settings) -> RestorePointResult<Self> {
        paths.ensure_directories()?;
        Ok(Self::new(BackupContext::local(paths, settings)))
    }

    /// The underlying engine, for callers that want per-file failures
    pub fn engine(&self) -> &BackupEngine {
        &self.engine
    }

    pub fn create_full_backup(&self) -> BackupRecord {
        self.engine.create_full_backup()
    }

    pub fn create_incremental_backup(&self) -> BackupRecord {
        self.engine.create_incremental_backup()
    }

    pub fn list_backups(&self) -> Vec<BackupRecord> {
        self.engine.list_backups()
    }

    pub fn create_snapshot(&self, label: &str) -> RestorePointResult<SnapshotRecord> {
        self.snapshots.create_snapshot(label)
    }

    pub fn list_snapshots(&self) -> Vec<SnapshotRecord> {
        self.snapshots.list_snapshots()
    }

    pub fn validate_backup(&self, id: &str) -> ValidationResult {
        self.validator.validate_backup(id)
    }

    pub fn restore_from_backup(&self, id: &str) -> RestoreResult {
        self.restore.restore_from_backup(id)
    }

    pub fn restore_from_snapshot(&self, snapshot_id: &str) -> RestoreResult {
        self.restore.restore_from_snapshot(snapshot_id)
    }
}
