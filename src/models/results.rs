//! Outcomes of validation and restore
//!
//! Neither is persisted. Failures are carried as human-readable strings so a
//! caller can tell "incomplete" from "corrupted" by which messages appear.

use serde::Serialize;

/// Error emitted when the stored checksum cannot be reproduced
pub const CHECKSUM_MISMATCH: &str = "Backup checksum mismatch - backup may be corrupted";

/// Prefix of the aggregated missing-files error
pub const MISSING_FILES_PREFIX: &str = "Missing files in backup: ";

/// A file that could not be copied during backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub error: String,
}

/// Result of validating a backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub success: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Build a result; success means no errors were collected
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            success: errors.is_empty(),
            errors,
        }
    }

    /// A failed result with a single error
    pub fn failure(error: impl Into<String>) -> Self {
        Self::from_errors(vec![error.into()])
    }

    /// Whether some recorded files are absent from the backup
    pub fn has_missing_files(&self) -> bool {
        self.errors.iter().any(|e| e.starts_with(MISSING_FILES_PREFIX))
    }

    /// Whether the stored checksum did not match the backup contents
    pub fn is_corrupted(&self) -> bool {
        self.errors.iter().any(|e| e == CHECKSUM_MISMATCH)
    }
}

/// Result of restoring from a backup or snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreResult {
    pub success: bool,
    /// Paths that were actually restored
    pub restored_files: Vec<String>,
    pub errors: Vec<String>,
    /// Wall-clock time of the whole operation, at least 1
    pub duration_ms: u64,
}

impl RestoreResult {
    /// Build a result; success means no errors were collected
    pub fn new(restored_files: Vec<String>, errors: Vec<String>, duration_ms: u64) -> Self {
        Self {
            success: errors.is_empty(),
            restored_files,
            errors,
            duration_ms: duration_ms.max(1),
        }
    }

    /// A failed result that touched no files
    pub fn failure(errors: Vec<String>, duration_ms: u64) -> Self {
        let errors = if errors.is_empty() {
            vec!["Restore failed".to_string()]
        } else {
            errors
        };
        Self::new(Vec::new(), errors, duration_ms)
    }

    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        if self.success {
            format!("Restored {} file(s) in {} ms", self.restored_files.len(), self.duration_ms)
        } else {
            format!(
                "Restored {} file(s) with {} error(s) in {} ms",
                self.restored_files.len(),
                self.errors.len(),
                self.duration_ms
            )
        }
    }
}
