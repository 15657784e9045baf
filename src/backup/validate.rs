//! Backup validation
//!
//! Two checks: a structural one (directory and every recorded file present)
//! and a content one (checksum of what is present equals the stored
//! checksum). All problems are reported in one pass; validation never
//! modifies the backup.

use crate::error::RestorePointError;
use crate::models::{BackupRecord, ValidationResult, CHECKSUM_MISMATCH, MISSING_FILES_PREFIX};

use super::checksum::{compute_checksum, FileContent};
use super::context::{join_relative, BackupContext};

/// Checks backups for missing files and corruption
#[derive(Clone)]
pub struct Validator {
    ctx: BackupContext,
}

impl Validator {
    /// Create a new Validator
    pub fn new(ctx: BackupContext) -> Self {
        Self { ctx }
    }

    /// Validate the backup with the given id
    pub fn validate_backup(&self, id: &str) -> ValidationResult {
        match self.ctx.store.find_backup(id) {
            Ok(Some(record)) => self.validate_record(&record),
            Ok(None) => ValidationResult::failure(RestorePointError::backup_not_found(id).to_string()),
            Err(e) => ValidationResult::failure(format!("Failed to load backup metadata: {}", e)),
        }
    }

    /// Validate a backup record against the files on disk
    pub fn validate_record(&self, record: &BackupRecord) -> ValidationResult {
        let fs = &self.ctx.fs;
        let mut errors = Vec::new();

        if !fs.exists(&record.path) {
            errors.push(format!("Backup directory not found: {}", record.path.display()));
        }

        let mut missing = Vec::new();
        let mut unreadable = Vec::new();
        let mut present = Vec::new();
        for relative in &record.included_files {
            let path = match join_relative(&record.path, relative) {
                Ok(path) => path,
                Err(_) => {
                    errors.push(format!("Invalid path in backup: {}", relative));
                    continue;
                }
            };

            if !fs.exists(&path) {
                missing.push(relative.as_str());
                continue;
            }

            match fs.read(&path) {
                Ok(content) => present.push(FileContent::new(relative.clone(), content)),
                Err(e) => {
                    tracing::warn!(path = %relative, error = %e, "Backup file is unreadable");
                    unreadable.push(relative.as_str());
                }
            }
        }

        if !missing.is_empty() {
            errors.push(format!("{}{}", MISSING_FILES_PREFIX, missing.join(", ")));
        }
        if !unreadable.is_empty() {
            errors.push(format!("Unreadable files in backup: {}", unreadable.join(", ")));
        }

        if compute_checksum(&present) != record.checksum {
            errors.push(CHECKSUM_MISMATCH.to_string());
        }

        let result = ValidationResult::from_errors(errors);
        if result.success {
            tracing::info!(id = %record.id, files = record.included_files.len(), "Backup is valid");
        } else {
            tracing::warn!(id = %record.id, errors = ?result.errors, "Backup failed validation");
        }
        result
    }
}
