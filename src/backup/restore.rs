//! Restoration from backups and snapshots
//!
//! Every recorded file is copied back to its place in the working tree.
//! Failures are isolated per file: one locked or unreadable file is reported
//! and the rest are still restored.

use std::time::Instant;

use crate::error::RestorePointError;
use crate::models::{BackupRecord, RestoreResult};

use super::context::{join_relative, BackupContext};
use super::validate::Validator;

/// Handles restoring from backups and snapshots
pub struct RestoreManager {
    ctx: BackupContext,
    validator: Validator,
    verify_first: bool,
}

impl RestoreManager {
    /// Create a new RestoreManager; verification follows the settings
    pub fn new(ctx: BackupContext, validator: Validator) -> Self {
        let verify_first = ctx.settings.verify_before_restore;
        Self {
            ctx,
            validator,
            verify_first,
        }
    }

    /// Validate each backup before restoring from it
    pub fn with_verification(mut self, verify_first: bool) -> Self {
        self.verify_first = verify_first;
        self
    }

    /// Restore every file of a backup into the working tree
    pub fn restore_from_backup(&self, id: &str) -> RestoreResult {
        let started = Instant::now();

        let record = match self.ctx.store.find_backup(id) {
            Ok(Some(record)) => record,
            Ok(None) => {
                return RestoreResult::failure(
                    vec![RestorePointError::backup_not_found(id).to_string()],
                    elapsed_ms(started),
                )
            }
            Err(e) => {
                return RestoreResult::failure(
                    vec![format!("Failed to load backup metadata: {}", e)],
                    elapsed_ms(started),
                )
            }
        };

        if self.verify_first {
            let validation = self.validator.validate_record(&record);
            if !validation.success {
                tracing::warn!(id, "Refusing to restore from a backup that failed validation");
                return RestoreResult::failure(validation.errors, elapsed_ms(started));
            }
        }

        let mut restored_files = Vec::new();
        let mut errors = Vec::new();
        for relative in &record.included_files {
            match self.restore_file(&record, relative) {
                Ok(()) => restored_files.push(relative.clone()),
                Err(cause) => {
                    tracing::warn!(path = %relative, %cause, "Failed to restore file");
                    errors.push(format!("Failed to restore {}: {}", relative, cause));
                }
            }
        }

        let result = RestoreResult::new(restored_files, errors, elapsed_ms(started));
        tracing::info!(
            id,
            restored = result.restored_files.len(),
            failed = result.errors.len(),
            duration_ms = result.duration_ms,
            "Restore finished"
        );
        result
    }

    /// Restore the backup a snapshot refers to
    pub fn restore_from_snapshot(&self, snapshot_id: &str) -> RestoreResult {
        let started = Instant::now();

        match self.ctx.store.find_snapshot(snapshot_id) {
            Ok(Some(snapshot)) => self.restore_from_backup(&snapshot.backup_id),
            Ok(None) => RestoreResult::failure(
                vec![RestorePointError::snapshot_not_found(snapshot_id).to_string()],
                elapsed_ms(started),
            ),
            Err(e) => RestoreResult::failure(
                vec![format!("Failed to load snapshot metadata: {}", e)],
                elapsed_ms(started),
            ),
        }
    }

    fn restore_file(&self, record: &BackupRecord, relative: &str) -> Result<(), String> {
        let escapes = |_| "path escapes project root".to_string();
        let source = join_relative(&record.path, relative).map_err(escapes)?;
        let target = join_relative(self.ctx.paths.project_root(), relative).map_err(escapes)?;

        if let Some(parent) = target.parent() {
            self.ctx.fs.create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        self.ctx.fs.copy(&source, &target).map_err(|e| e.to_string())?;
        Ok(())
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
