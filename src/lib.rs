//! restorepoint - Backup, snapshot and restore for project working trees
//!
//! This library protects a project's files during risky automated changes
//! such as framework upgrades. It takes full and incremental backups,
//! validates them with a content checksum, records named snapshots and
//! restores any of them with per-file failure isolation.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Project/state paths and settings
//! - `error`: Custom error types
//! - `fs`: Filesystem capability (real and in-memory)
//! - `enumerate`: Include/exclude glob file enumeration
//! - `models`: Backup and snapshot records, validation and restore results
//! - `storage`: JSON metadata store
//! - `backup`: Backup engine, snapshots, validation and restore
//! - `cli`, `display`: Command handlers and terminal formatting
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use restorepoint::backup::BackupService;
//! use restorepoint::config::{RestorePointPaths, Settings};
//!
//! let paths = RestorePointPaths::new(".")?;
//! let settings = Settings::load_or_create(&paths)?;
//! let service = BackupService::open(paths, settings)?;
//! let record = service.create_full_backup();
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod enumerate;
pub mod error;
pub mod fs;
pub mod logging;
pub mod models;
pub mod storage;

pub use error::{RestorePointError, RestorePointResult};
