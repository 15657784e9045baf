//! JSON list files shared between processes
//!
//! A list file is replaced through a uniquely named temporary file in the
//! same directory, so two writers never share a temp path and a reader sees
//! either the old list or the new one. Read-modify-write cycles hold a
//! [`FileLock`] so that concurrent appends from separate processes
//! serialize instead of overwriting each other.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::error::{RestorePointError, RestorePointResult};

/// Read a JSON file, or `T::default()` if it does not exist yet
pub fn read_json<T, P>(path: P) -> RestorePointResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(RestorePointError::Storage(format!(
                "Failed to open {}: {}",
                path.display(),
                e
            )))
        }
    };

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| RestorePointError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Replace `path` with the JSON encoding of `data`
///
/// The content is synced to disk before the temporary file is renamed over
/// `path`.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> RestorePointResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let dir = parent_dir(path)?;

    let mut temp = NamedTempFile::new_in(&dir).map_err(|e| {
        RestorePointError::Storage(format!("Failed to create temp file in {}: {}", dir.display(), e))
    })?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, data)
            .map_err(|e| RestorePointError::Storage(format!("Failed to serialize {}: {}", path.display(), e)))?;
        writer
            .flush()
            .map_err(|e| RestorePointError::Storage(format!("Failed to flush {}: {}", path.display(), e)))?;
    }

    temp.as_file()
        .sync_all()
        .map_err(|e| RestorePointError::Storage(format!("Failed to sync {}: {}", path.display(), e)))?;

    // A failed persist drops the temp file, which deletes it
    temp.persist(path).map_err(|e| {
        RestorePointError::Storage(format!("Failed to replace {}: {}", path.display(), e.error))
    })?;

    Ok(())
}

/// Exclusive advisory lock on a file, released on drop
///
/// The lock is per open file, so it also excludes other threads of the same
/// process that acquire it separately.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Block until the lock on `path` is held, creating the file if needed
    pub fn acquire(path: impl AsRef<Path>) -> RestorePointResult<Self> {
        let path = path.as_ref();
        parent_dir(path)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| {
                RestorePointError::Storage(format!("Failed to open lock file {}: {}", path.display(), e))
            })?;

        file.lock_exclusive().map_err(|e| {
            RestorePointError::Storage(format!("Failed to lock {}: {}", path.display(), e))
        })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to release lock");
        }
    }
}

/// The directory holding `path`, created if missing
fn parent_dir(path: &Path) -> RestorePointResult<PathBuf> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    fs::create_dir_all(&dir).map_err(|e| {
        RestorePointError::Storage(format!("Failed to create directory {}: {}", dir.display(), e))
    })?;

    Ok(dir)
}
