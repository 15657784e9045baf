//! Backup and snapshot records
//!
//! Records are created once, never mutated, and only ever appended to the
//! metadata store.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of backup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupType {
    /// Every enumerated file
    Full,
    /// Only files modified after the previous backup
    Incremental,
}

impl BackupType {
    /// Prefix used in record ids
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Incremental => "incremental",
        }
    }
}

impl fmt::Display for BackupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.id_prefix())
    }
}

/// One backup: the files copied, their total size and integrity checksum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    /// `<type>-<unix-millis>`
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub backup_type: BackupType,
    /// Total bytes copied
    pub size: u64,
    /// SHA-256 over the copied contents in path order
    pub checksum: String,
    /// Relative paths that were actually copied, sorted and unique
    pub included_files: Vec<String>,
    #[serde(default)]
    pub has_environment_snapshot: bool,
    /// Absolute location of the copied files
    pub path: PathBuf,
}

impl BackupRecord {
    /// Number of files in the backup
    pub fn file_count(&self) -> usize {
        self.included_files.len()
    }
}

/// A labelled restore point wrapping a full backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// `snapshot-<unix-millis>`
    pub id: String,
    pub label: String,
    pub timestamp: DateTime<Utc>,
    pub backup_id: String,
    pub description: String,
}

impl SnapshotRecord {
    /// Description stored for a snapshot label
    pub fn describe(label: &str) -> String {
        format!("Snapshot created: {}", label)
    }
}
