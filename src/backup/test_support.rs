//! In-memory fixtures shared by the backup tests

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::config::{RestorePointPaths, Settings};
use crate::enumerate::FileEnumerator;
use crate::error::{RestorePointError, RestorePointResult};
use crate::fs::MemoryFileSystem;
use crate::models::{BackupRecord, SnapshotRecord};
use crate::storage::{InMemoryMetadataStore, MetadataStore};

use super::{BackupContext, BackupEngine, BackupService};

pub(crate) const PROJECT_ROOT: &str = "/project";

/// Enumerator returning a fixed list, or failing on demand
#[derive(Default)]
pub(crate) struct FixedEnumerator {
    files: RwLock<Option<Vec<String>>>,
}

impl FixedEnumerator {
    pub(crate) fn push(&self, relative: &str) {
        let mut files = self.files.write().unwrap();
        files.get_or_insert_with(Vec::new).push(relative.to_string());
    }

    pub(crate) fn fail(&self) {
        *self.files.write().unwrap() = None;
    }
}

impl FileEnumerator for FixedEnumerator {
    fn enumerate(&self, _root: &std::path::Path, _include: &[String]) -> RestorePointResult<Vec<String>> {
        self.files
            .read()
            .unwrap()
            .clone()
            .ok_or_else(|| RestorePointError::Enumeration("permission denied".into()))
    }
}

pub(crate) struct Fixture {
    pub fs: Arc<MemoryFileSystem>,
    pub enumerator: Arc<FixedEnumerator>,
    pub store: Arc<InMemoryMetadataStore>,
    pub ctx: BackupContext,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let fs = Arc::new(MemoryFileSystem::new());
        let enumerator = Arc::new(FixedEnumerator {
            files: RwLock::new(Some(Vec::new())),
        });
        let store = Arc::new(InMemoryMetadataStore::new());
        let paths = RestorePointPaths::with_state_dir(
            PathBuf::from(PROJECT_ROOT),
            PathBuf::from(PROJECT_ROOT).join(".restorepoint"),
        );
        let ctx = BackupContext::new(
            paths,
            Settings::default(),
            fs.clone(),
            enumerator.clone(),
            store.clone(),
        );

        Self {
            fs,
            enumerator,
            store,
            ctx,
        }
    }

    /// Add a working-tree file last modified an hour ago
    pub(crate) fn add_file(&self, relative: &str, contents: impl Into<Vec<u8>>) {
        self.fs.insert(
            self.project_path(relative),
            contents,
            Utc::now() - Duration::hours(1),
        );
        self.enumerator.push(relative);
    }

    pub(crate) fn project_path(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .fold(PathBuf::from(PROJECT_ROOT), |path, part| path.join(part))
    }

    pub(crate) fn engine(&self) -> BackupEngine {
        BackupEngine::new(self.ctx.clone())
    }

    pub(crate) fn service(&self) -> BackupService {
        BackupService::new(self.ctx.clone())
    }

    /// The same files and enumerator over a different metadata store
    pub(crate) fn context_with_store(&self, store: Arc<dyn MetadataStore>) -> BackupContext {
        BackupContext::new(
            self.ctx.paths.clone(),
            self.ctx.settings.clone(),
            self.fs.clone(),
            self.enumerator.clone(),
            store,
        )
    }
}

/// A wall-clock instant strictly after `timestamp`, as a real edit would get
pub(crate) fn edited_after(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    loop {
        let now = Utc::now();
        if now > timestamp {
            return now;
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
}

/// Store whose appends always fail, as on a full or read-only disk
pub(crate) struct RejectingStore;

impl MetadataStore for RejectingStore {
    fn load_backups(&self) -> RestorePointResult<Vec<BackupRecord>> {
        Ok(Vec::new())
    }

    fn append_backup(&self, _record: &BackupRecord) -> RestorePointResult<()> {
        Err(RestorePointError::Storage("No space left on device".into()))
    }

    fn load_snapshots(&self) -> RestorePointResult<Vec<SnapshotRecord>> {
        Ok(Vec::new())
    }

    fn append_snapshot(&self, _record: &SnapshotRecord) -> RestorePointResult<()> {
        Err(RestorePointError::Storage("No space left on device".into()))
    }
}
