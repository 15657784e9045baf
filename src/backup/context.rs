//! Shared collaborators of the backup components

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::config::{RestorePointPaths, Settings};
use crate::enumerate::{FileEnumerator, GlobEnumerator};
use crate::error::{RestorePointError, RestorePointResult};
use crate::fs::{FileSystem, LocalFileSystem};
use crate::models::IdClock;
use crate::storage::{JsonMetadataStore, MetadataStore};

/// Everything the engine, validator and restore manager depend on
#[derive(Clone)]
pub struct BackupContext {
    pub paths: RestorePointPaths,
    pub settings: Settings,
    pub fs: Arc<dyn FileSystem>,
    pub enumerator: Arc<dyn FileEnumerator>,
    pub store: Arc<dyn MetadataStore>,
    pub ids: Arc<IdClock>,
}

impl BackupContext {
    /// Create a context from explicit collaborators
    pub fn new(
        paths: RestorePointPaths,
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        enumerator: Arc<dyn FileEnumerator>,
        store: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            paths,
            settings,
            fs,
            enumerator,
            store,
            ids: Arc::new(IdClock::new()),
        }
    }

    /// Context over the host filesystem, glob enumeration and JSON metadata files
    pub fn local(paths: RestorePointPaths, settings: Settings) -> Self {
        let enumerator = GlobEnumerator::new(settings.exclude_patterns.clone())
            .skip_dir(paths.state_dir().to_path_buf());
        let store = JsonMetadataStore::new(
            paths.backups_file(),
            paths.snapshots_file(),
            paths.metadata_lock_file(),
        );

        Self::new(
            paths,
            settings,
            Arc::new(LocalFileSystem),
            Arc::new(enumerator),
            Arc::new(store),
        )
    }
}

/// Join a recorded `/`-separated relative path onto `base`
///
/// Rejects absolute paths, empty segments, `.` and `..`, so a record can
/// never point outside `base`.
pub fn join_relative(base: &Path, relative: &str) -> RestorePointResult<PathBuf> {
    let escapes = || RestorePointError::InvalidPath(format!("{} escapes {}", relative, base.display()));

    if relative.is_empty() {
        return Err(escapes());
    }

    let mut joined = base.to_path_buf();
    for segment in relative.split('/') {
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => joined.push(part),
            _ => return Err(escapes()),
        }
    }
    Ok(joined)
}
