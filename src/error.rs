//! Custom error types for restorepoint
//!
//! The public backup/restore operations report not-found, partial failure and
//! corruption as data. This error type covers the collaborators underneath them:
//! settings, the metadata store, file enumeration and path handling.

use thiserror::Error;

/// The main error type for restorepoint operations
#[derive(Error, Debug)]
pub enum RestorePointError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Metadata store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// The working tree could not be listed
    #[error("Enumeration error: {0}")]
    Enumeration(String),

    /// A recorded path cannot be mapped into the project tree
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Entity not found errors
    #[error("{entity_type} {identifier} not found")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },
}

impl RestorePointError {
    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for snapshots
    pub fn snapshot_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Snapshot",
            identifier: identifier.into(),
        }
    }
}

impl From<std::io::Error> for RestorePointError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for restorepoint operations
pub type RestorePointResult<T> = Result<T, RestorePointError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RestorePointError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_messages() {
        let err = RestorePointError::backup_not_found("full-1700000000000");
        assert_eq!(err.to_string(), "Backup full-1700000000000 not found");
        assert!(matches!(err, RestorePointError::NotFound { entity_type: "Backup", .. }));

        let err = RestorePointError::snapshot_not_found("snapshot-1");
        assert_eq!(err.to_string(), "Snapshot snapshot-1 not found");
    }

    #[test]
    fn test_duplicate_error() {
        let err = RestorePointError::Duplicate {
            entity_type: "Backup",
            identifier: "full-1".into(),
        };
        assert_eq!(err.to_string(), "Backup already exists: full-1");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RestorePointError = io_err.into();
        assert!(matches!(err, RestorePointError::Io(_)));
    }
}
