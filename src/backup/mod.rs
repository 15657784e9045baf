//! Backup system for restorepoint
//!
//! Protects a project's working tree during risky changes with full and
//! incremental backups, checksum validation, named snapshots and restore.
//!
//! # Architecture
//!
//! - `checksum`: SHA-256 over file contents in canonical path order
//! - `BackupEngine`: copies files into `<backup-root>/<id>/` and records them
//! - `SnapshotManager`: labelled aliases over fresh full backups
//! - `Validator`: structural and checksum checks of a stored backup
//! - `RestoreManager`: copies a backup back, isolating per-file failures
//! - `BackupService`: all of the above over one `BackupContext`
//!
//! Not-found ids, per-file failures and corruption are returned as data
//! (`BackupRecord`, `ValidationResult`, `RestoreResult`), never as errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use restorepoint::backup::BackupService;
//! use restorepoint::config::{RestorePointPaths, Settings};
//!
//! let paths = RestorePointPaths::new(".")?;
//! let service = BackupService::open(paths, Settings::default())?;
//!
//! let snapshot = service.create_snapshot("before framework upgrade")?;
//! // ... risky migration step ...
//! let result = service.restore_from_snapshot(&snapshot.id);
//! println!("{}", result.summary());
//! ```

pub mod checksum;
mod context;
mod engine;
mod restore;
mod service;
mod snapshot;
mod validate;

#[cfg(test)]
pub(crate) mod test_support;

pub use checksum::{compute_checksum, FileContent};
pub use context::{join_relative, BackupContext};
pub use engine::{BackupEngine, BackupOutcome};
pub use restore::RestoreManager;
pub use service::BackupService;
pub use snapshot::SnapshotManager;
pub use validate::Validator;
