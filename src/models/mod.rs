//! Core data models for restorepoint
//!
//! Persisted records (backups, snapshots), the transient results of
//! validation and restore, and record id generation.

pub mod backup;
pub mod ids;
pub mod results;

pub use backup::{BackupRecord, BackupType, SnapshotRecord};
pub use ids::IdClock;
pub use results::{FileFailure, RestoreResult, ValidationResult, CHECKSUM_MISMATCH, MISSING_FILES_PREFIX};
