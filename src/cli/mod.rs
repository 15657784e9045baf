//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the backup service.

pub mod backup;
pub mod restore;
pub mod snapshot;

pub use backup::{handle_backup_command, BackupCommands};
pub use restore::{handle_restore, handle_restore_snapshot, handle_validate};
pub use snapshot::{handle_snapshot_command, SnapshotCommands};

/// Whether a command achieved what was asked
///
/// Validation and restore failures are reported as data rather than errors;
/// the binary maps `Failure` to a non-zero exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
}
