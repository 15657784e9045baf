//! Working tree enumeration
//!
//! Produces the candidate file list for a backup: `/`-separated paths
//! relative to the project root, sorted.

use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::error::{RestorePointError, RestorePointResult};

/// Lists candidate files under a project root
pub trait FileEnumerator: Send + Sync {
    /// Relative paths of every file under `root` matching `include_patterns`
    fn enumerate(&self, root: &Path, include_patterns: &[String]) -> RestorePointResult<Vec<String>>;
}

/// Walks the real filesystem and filters with glob patterns
///
/// Symlinks are not followed. Directories registered with
/// [`GlobEnumerator::skip_dir`] are never descended into.
#[derive(Debug, Clone, Default)]
pub struct GlobEnumerator {
    exclude_patterns: Vec<String>,
    skip_dirs: Vec<PathBuf>,
}

impl GlobEnumerator {
    /// Create an enumerator with the given exclude patterns
    pub fn new(exclude_patterns: Vec<String>) -> Self {
        Self {
            exclude_patterns,
            skip_dirs: Vec::new(),
        }
    }

    /// Never descend into `dir` (typically the state directory)
    pub fn skip_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.skip_dirs.push(dir.into());
        self
    }
}

impl FileEnumerator for GlobEnumerator {
    fn enumerate(&self, root: &Path, include_patterns: &[String]) -> RestorePointResult<Vec<String>> {
        if !root.is_dir() {
            return Err(RestorePointError::Enumeration(format!(
                "Project root is not a directory: {}",
                root.display()
            )));
        }

        let include = build_globset(include_patterns)?;
        let exclude = build_globset(&self.exclude_patterns)?;
        let pruned = build_globset(&excluded_directory_patterns(&self.exclude_patterns))?;

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                if self.skip_dirs.iter().any(|dir| entry.path().starts_with(dir)) {
                    return false;
                }
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                relative_path_string(root, entry.path()).map_or(true, |relative| !pruned.is_match(&relative))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(relative) = relative_path_string(root, entry.path()) else {
                tracing::warn!(path = %entry.path().display(), "Skipping path that is not valid UTF-8");
                continue;
            };

            if include.is_match(&relative) && !exclude.is_match(&relative) {
                files.push(relative);
            }
        }

        files.sort();
        Ok(files)
    }
}

fn build_globset(patterns: &[String]) -> RestorePointResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| RestorePointError::Enumeration(format!("Invalid glob pattern '{}': {}", pattern, e)))?;
        builder.add(glob);
    }

    builder
        .build()
        .map_err(|e| RestorePointError::Enumeration(format!("Failed to build glob set: {}", e)))
}

/// Directory globs whose whole contents an exclude pattern covers
///
/// `**/node_modules/**` excludes everything below any `node_modules`, so the
/// walk can skip `**/node_modules` without reading it.
fn excluded_directory_patterns(exclude_patterns: &[String]) -> Vec<String> {
    exclude_patterns
        .iter()
        .filter_map(|pattern| pattern.strip_suffix("/**"))
        .filter(|dir| !dir.is_empty())
        .map(str::to_string)
        .collect()
}

/// Convert an absolute path under `root` into a `/`-separated relative path
fn relative_path_string(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_enumerates_matching_files_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "package.json", "{}");
        write(root, "app/page.tsx", "export default 1");
        write(root, "app/logo.png", "binary");
        write(root, "README.md", "# readme");

        let enumerator = GlobEnumerator::default();
        let files = enumerator
            .enumerate(root, &patterns(&["**/*.tsx", "**/*.json"]))
            .unwrap();

        assert_eq!(files, vec!["app/page.tsx", "package.json"]);
    }

    #[test]
    fn test_exclude_patterns_and_skip_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "src/index.ts", "1");
        write(root, "node_modules/lib/index.ts", "2");
        write(root, "web/node_modules/lib/index.ts", "3");
        write(root, ".restorepoint/backups/full-1/src/index.ts", "4");

        let enumerator = GlobEnumerator::new(patterns(&["**/node_modules/**"]))
            .skip_dir(root.join(".restorepoint"));
        let files = enumerator.enumerate(root, &patterns(&["**/*.ts"])).unwrap();

        assert_eq!(files, vec!["src/index.ts"]);
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "top.ts", "1");
        write(root, "nested/deep.ts", "2");

        let files = GlobEnumerator::default()
            .enumerate(root, &patterns(&["*.ts"]))
            .unwrap();

        assert_eq!(files, vec!["top.ts"]);
    }

    #[test]
    fn test_missing_root_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let err = GlobEnumerator::default()
            .enumerate(&missing, &patterns(&["**/*"]))
            .unwrap_err();
        assert!(matches!(err, RestorePointError::Enumeration(_)));
    }

    #[test]
    fn test_invalid_glob_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = GlobEnumerator::default()
            .enumerate(temp_dir.path(), &patterns(&["src/[unclosed"]))
            .unwrap_err();
        assert!(matches!(err, RestorePointError::Enumeration(_)));
    }

    #[test]
    fn test_excluded_directories_are_pruned() {
        let dirs = excluded_directory_patterns(&patterns(&[
            "**/node_modules/**",
            "**/.git/**",
            "**/*.log",
            "/**",
        ]));
        assert_eq!(dirs, vec!["**/node_modules", "**/.git"]);

        let pruned = build_globset(&dirs).unwrap();
        assert!(pruned.is_match("node_modules"));
        assert!(pruned.is_match("web/node_modules"));
        assert!(!pruned.is_match("node_modules_cache"));
        assert!(!pruned.is_match("src"));
    }
}
