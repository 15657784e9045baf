//! Named restore points
//!
//! A snapshot never copies files itself. It takes a fresh full backup and
//! records a labelled alias for it, so a restore point is self-contained and
//! never depends on a chain of incremental backups.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::error::{RestorePointError, RestorePointResult};
use crate::models::ids::record_id;
use crate::models::{BackupType, SnapshotRecord};

use super::context::BackupContext;
use super::engine::BackupEngine;

/// Creates and lists snapshots
pub struct SnapshotManager {
    ctx: BackupContext,
    engine: Arc<BackupEngine>,
}

impl SnapshotManager {
    /// Create a new SnapshotManager
    pub fn new(ctx: BackupContext, engine: Arc<BackupEngine>) -> Self {
        Self { ctx, engine }
    }

    /// Take a full backup and record a snapshot referencing it
    ///
    /// Fails only when a record cannot be written to the metadata store; the
    /// snapshot is appended after its backup record, never before. When the
    /// backup record cannot be written its copies are removed as well.
    pub fn create_snapshot(&self, label: &str) -> RestorePointResult<SnapshotRecord> {
        let outcome = self.engine.run(BackupType::Full);
        outcome.persisted?;

        loop {
            let taken: HashSet<String> = self
                .ctx
                .store
                .load_snapshots()?
                .into_iter()
                .map(|s| s.id)
                .collect();
            let now = Utc::now();
            let millis = self
                .ctx
                .ids
                .next_millis(now, |m| taken.contains(&record_id("snapshot", m)));

            let record = SnapshotRecord {
                id: record_id("snapshot", millis),
                label: label.to_string(),
                timestamp: now,
                backup_id: outcome.record.id.clone(),
                description: SnapshotRecord::describe(label),
            };

            match self.ctx.store.append_snapshot(&record) {
                Ok(()) => {
                    tracing::info!(id = %record.id, backup = %record.backup_id, label, "Snapshot created");
                    return Ok(record);
                }
                // Taken by another process between the load and the append
                Err(RestorePointError::Duplicate { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// All snapshots, oldest first
    pub fn list_snapshots(&self) -> Vec<SnapshotRecord> {
        self.ctx.store.load_snapshots().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load snapshot records");
            Vec::new()
        })
    }
}
