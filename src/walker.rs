use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::errors::{Result, ScannerError};
use crate::filter::PathFilter;

/// Enumerates scannable files under a root, applying the `PathFilter` to
/// every file and directory on the way down.
///
/// Directories are tracked by canonical identity so symlink cycles terminate.
/// A subdirectory that cannot be listed is logged and skipped; only a missing
/// root is fatal.
pub struct DirectoryWalker<'a> {
    filter: &'a PathFilter,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(filter: &'a PathFilter) -> Self {
        Self { filter }
    }

    /// Collect every file under `root` that passes the filter.
    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(ScannerError::NotFound {
                path: root.to_path_buf(),
            });
        }
        let mut files = Vec::new();
        let mut visited = HashSet::new();
        self.walk_dir(root, &mut visited, &mut files);
        Ok(files)
    }

    fn walk_dir(&self, dir: &Path, visited: &mut HashSet<PathBuf>, files: &mut Vec<PathBuf>) {
        match dir.canonicalize() {
            Ok(identity) => {
                if !visited.insert(identity) {
                    // Already walked through a symlink cycle.
                    return;
                }
            }
            Err(err) => {
                warn!("cannot resolve {}: {err}", dir.display());
                return;
            }
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("skipping unreadable directory {}: {err}", dir.display());
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping entry under {}: {err}", dir.display());
                    continue;
                }
            };
            let path = entry.path();
            if path.is_dir() {
                if self.filter.should_descend(&path) {
                    self.walk_dir(&path, visited, files);
                }
            } else if self.filter.should_scan(&path) {
                files.push(path);
            }
        }
    }
}
