//! Path management for restorepoint
//!
//! Everything restorepoint persists lives in a state directory, by default
//! `.restorepoint/` inside the project being protected.
//!
//! ## Path Resolution Order
//!
//! 1. `RESTOREPOINT_DIR` environment variable (if set)
//! 2. `<project-root>/.restorepoint`

use std::path::{Path, PathBuf};

use crate::error::RestorePointError;

/// Name of the state directory created inside the project root
pub const STATE_DIR_NAME: &str = ".restorepoint";

/// Manages all paths used by restorepoint
#[derive(Debug, Clone)]
pub struct RestorePointPaths {
    /// Root of the working tree being backed up
    project_root: PathBuf,
    /// Directory holding metadata, settings and backup copies
    state_dir: PathBuf,
}

impl RestorePointPaths {
    /// Create paths for a project root
    ///
    /// The state directory honours `RESTOREPOINT_DIR`; otherwise it is
    /// `<project_root>/.restorepoint`. A relative project root is resolved
    /// against the current directory so that backup paths are absolute.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn new(project_root: impl Into<PathBuf>) -> Result<Self, RestorePointError> {
        let project_root = absolutize(project_root.into())?;
        let state_dir = match std::env::var("RESTOREPOINT_DIR") {
            Ok(custom) => absolutize(PathBuf::from(custom))?,
            Err(_) => project_root.join(STATE_DIR_NAME),
        };

        Ok(Self {
            project_root,
            state_dir,
        })
    }

    /// Create paths with an explicit state directory (useful for testing)
    pub fn with_state_dir(project_root: PathBuf, state_dir: PathBuf) -> Self {
        Self {
            project_root,
            state_dir,
        }
    }

    /// Get the project root
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the state directory
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Get the backup root; each backup is copied into `<backup_dir>/<id>/`
    pub fn backup_dir(&self) -> PathBuf {
        self.state_dir.join("backups")
    }

    /// Get the copy directory of a specific backup
    pub fn backup_path(&self, id: &str) -> PathBuf {
        self.backup_dir().join(id)
    }

    /// Get the environment capture file of a specific backup
    pub fn environment_file(&self, id: &str) -> PathBuf {
        self.backup_dir().join(format!("{}.env.json", id))
    }

    /// Get the path to backups.json
    pub fn backups_file(&self) -> PathBuf {
        self.state_dir.join("backups.json")
    }

    /// Get the path to snapshots.json
    pub fn snapshots_file(&self) -> PathBuf {
        self.state_dir.join("snapshots.json")
    }

    /// Lock file serializing metadata appends across processes
    pub fn metadata_lock_file(&self) -> PathBuf {
        self.state_dir.join("metadata.lock")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.state_dir.join("config.json")
    }

    /// Ensure the state and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), RestorePointError> {
        std::fs::create_dir_all(&self.state_dir)
            .map_err(|e| RestorePointError::Io(format!("Failed to create state directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| RestorePointError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if restorepoint has been initialized (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, RestorePointError> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir()
        .map_err(|e| RestorePointError::Config(format!("Could not determine current directory: {}", e)))?;
    Ok(cwd.join(path))
}
