//! Configuration module for restorepoint
//!
//! This module provides configuration management including:
//! - State directory and backup path resolution
//! - Settings persistence

pub mod paths;
pub mod settings;

pub use paths::RestorePointPaths;
pub use settings::Settings;
