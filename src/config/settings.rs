//! User settings for restorepoint
//!
//! Controls which files are backed up, which environment variables are
//! captured alongside a backup, and whether restores are verified first.

use serde::{Deserialize, Serialize};

use super::paths::RestorePointPaths;
use crate::error::RestorePointError;

/// Settings for a protected project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Glob patterns (relative to the project root) selecting files to back up
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// Glob patterns excluded even when an include pattern matches
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Environment variables recorded next to each backup
    #[serde(default)]
    pub environment_keys: Vec<String>,

    /// Validate a backup before restoring from it
    #[serde(default)]
    pub verify_before_restore: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_include_patterns() -> Vec<String> {
    [
        "**/*.ts", "**/*.tsx", "**/*.js", "**/*.jsx", "**/*.mjs", "**/*.cjs", "**/*.json",
        "**/*.css", "**/*.scss", "**/*.md", "**/*.yml", "**/*.yaml", "**/*.toml", "**/.env*",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

fn default_exclude_patterns() -> Vec<String> {
    ["**/node_modules/**", "**/.git/**", "**/.next/**"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            include_patterns: default_include_patterns(),
            exclude_patterns: default_exclude_patterns(),
            environment_keys: Vec::new(),
            verify_before_restore: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &RestorePointPaths) -> Result<Self, RestorePointError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                RestorePointError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                RestorePointError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &RestorePointPaths) -> Result<(), RestorePointError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            RestorePointError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            RestorePointError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
