//! Filesystem capability used by the backup engine
//!
//! The engine never touches `std::fs` directly. It works through the
//! [`FileSystem`] trait so the host filesystem can be swapped for the
//! in-memory [`MemoryFileSystem`], which can also inject failures.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

/// Size and modification time of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

/// Primitive file operations the engine depends on
pub trait FileSystem: Send + Sync {
    /// Read a whole file
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or replace a file; the parent directory must exist
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Copy a file, returning the number of bytes copied
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Size and modification time of a file
    fn stat(&self, path: &Path) -> io::Result<FileStat>;

    /// Whether a file or directory exists
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory and all of its parents
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create a single directory; fails with `AlreadyExists` if anything is at `path`
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Delete a file
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Delete a directory and everything under it
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// The host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        fs::copy(from, to)
    }

    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let metadata = fs::metadata(path)?;
        Ok(FileStat {
            size: metadata.len(),
            modified: DateTime::<Utc>::from(metadata.modified()?),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

#[derive(Debug, Clone)]
struct MemoryFile {
    contents: Vec<u8>,
    modified: DateTime<Utc>,
}

/// In-memory filesystem with failure injection
///
/// Writes require the parent directory to exist, as on a real disk.
/// [`MemoryFileSystem::lock`] makes writes to a path fail and
/// [`MemoryFileSystem::deny_read`] makes reads of a path fail, both with
/// `PermissionDenied`.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RwLock<BTreeMap<PathBuf, MemoryFile>>,
    dirs: RwLock<BTreeSet<PathBuf>>,
    locked: RwLock<BTreeSet<PathBuf>>,
    unreadable: RwLock<BTreeSet<PathBuf>>,
}

fn read_guard<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_guard<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn permission_denied(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("permission denied: {}", path.display()),
    )
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}

impl MemoryFileSystem {
    /// Create an empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with an explicit modification time, creating its parents
    pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>, modified: DateTime<Utc>) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dirs(parent);
        }
        write_guard(&self.files).insert(
            path.to_path_buf(),
            MemoryFile {
                contents: contents.into(),
                modified,
            },
        );
    }

    /// Change a file's modification time
    pub fn set_modified(&self, path: impl AsRef<Path>, modified: DateTime<Utc>) {
        if let Some(file) = write_guard(&self.files).get_mut(path.as_ref()) {
            file.modified = modified;
        }
    }

    /// Delete a file, returning whether it existed
    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        write_guard(&self.files).remove(path.as_ref()).is_some()
    }

    /// Make every write to `path` fail
    pub fn lock(&self, path: impl AsRef<Path>) {
        write_guard(&self.locked).insert(path.as_ref().to_path_buf());
    }

    /// Make every read of `path` fail
    pub fn deny_read(&self, path: impl AsRef<Path>) {
        write_guard(&self.unreadable).insert(path.as_ref().to_path_buf());
    }

    /// Contents of a file, if present
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        read_guard(&self.files)
            .get(path.as_ref())
            .map(|f| f.contents.clone())
    }

    fn add_dirs(&self, path: &Path) {
        let mut dirs = write_guard(&self.dirs);
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if read_guard(&self.unreadable).contains(path) {
            return Err(permission_denied(path));
        }
        read_guard(&self.files)
            .get(path)
            .map(|f| f.contents.clone())
            .ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if read_guard(&self.locked).contains(path) {
            return Err(permission_denied(path));
        }
        if read_guard(&self.dirs).contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("is a directory: {}", path.display()),
            ));
        }
        let parent_exists = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => read_guard(&self.dirs).contains(parent),
            _ => true,
        };
        if !parent_exists {
            return Err(not_found(path));
        }

        write_guard(&self.files).insert(
            path.to_path_buf(),
            MemoryFile {
                contents: contents.to_vec(),
                modified: Utc::now(),
            },
        );
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        let contents = self.read(from)?;
        self.write(to, &contents)?;
        Ok(contents.len() as u64)
    }

    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        read_guard(&self.files)
            .get(path)
            .map(|f| FileStat {
                size: f.contents.len() as u64,
                modified: f.modified,
            })
            .ok_or_else(|| not_found(path))
    }

    fn exists(&self, path: &Path) -> bool {
        read_guard(&self.files).contains_key(path) || read_guard(&self.dirs).contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        {
            let files = read_guard(&self.files);
            if let Some(blocker) = path.ancestors().find(|a| files.contains_key(*a)) {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("not a directory: {}", blocker.display()),
                ));
            }
        }
        self.add_dirs(path);
        Ok(())
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        if self.exists(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("already exists: {}", path.display()),
            ));
        }
        let parent_exists = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => read_guard(&self.dirs).contains(parent),
            _ => true,
        };
        if !parent_exists {
            return Err(not_found(path));
        }

        write_guard(&self.dirs).insert(path.to_path_buf());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if read_guard(&self.locked).contains(path) {
            return Err(permission_denied(path));
        }
        write_guard(&self.files)
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        if !read_guard(&self.dirs).contains(path) {
            return Err(not_found(path));
        }
        write_guard(&self.files).retain(|file, _| !file.starts_with(path));
        write_guard(&self.dirs).retain(|dir| !dir.starts_with(path));
        Ok(())
    }
}
