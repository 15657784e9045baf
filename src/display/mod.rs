//! Display formatting for terminal output
//!
//! Provides utilities for formatting backups, snapshots and their results
//! as tables and detail views.

pub mod backup;

pub use backup::{
    format_age, format_backup_details, format_backup_list, format_restore_result, format_size,
    format_snapshot_list, format_validation,
};
