use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::errors::{Result, ScannerError};
use crate::extractor::{ClassExtractor, ClassSet};
use crate::filter::PathFilter;
use crate::walker::DirectoryWalker;

/// One input to a scan: either an explicit template file or a directory root
/// to walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    File(PathBuf),
    Root(PathBuf),
}

/// Result of one scan over a set of targets.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Every class found, deduplicated and lexicographically ordered.
    pub classes: ClassSet,
    /// Number of files whose text was extracted from.
    pub files_scanned: usize,
    /// Which files each class was found in, for reporting.
    pub origins: IndexMap<String, Vec<PathBuf>>,
}

/// Orchestrates walking and extraction over one or more targets.
pub struct ScanEngine {
    filter: PathFilter,
    extractor: ClassExtractor,
}

impl ScanEngine {
    pub fn new(filter: PathFilter, extractor: ClassExtractor) -> Self {
        Self { filter, extractor }
    }

    pub fn filter(&self) -> &PathFilter {
        &self.filter
    }

    /// Scan all targets and union the per-file class sets.
    ///
    /// A missing explicit file or directory root is fatal. A file that cannot
    /// be read or decoded is logged and skipped; the scan still succeeds with
    /// whatever the remaining files contributed. An empty result is valid.
    pub fn scan(&self, targets: &[ScanTarget]) -> Result<ScanOutcome> {
        let mut files = Vec::new();
        for target in targets {
            match target {
                ScanTarget::File(path) => {
                    if !path.is_file() {
                        return Err(ScannerError::NotFound { path: path.clone() });
                    }
                    files.push(path.clone());
                }
                ScanTarget::Root(root) => {
                    let walker = DirectoryWalker::new(&self.filter);
                    files.extend(walker.walk(root)?);
                }
            }
        }

        let per_file: Vec<(PathBuf, ClassSet)> = files
            .par_iter()
            .map(|path| match fs::read_to_string(path) {
                Ok(text) => (path.clone(), self.extractor.extract(&text)),
                Err(err) => {
                    warn!("skipping unreadable file {}: {err}", path.display());
                    (path.clone(), ClassSet::new())
                }
            })
            .collect();

        let mut classes = ClassSet::new();
        let mut origins: IndexMap<String, Vec<PathBuf>> = IndexMap::new();
        for (path, file_classes) in per_file {
            debug!(
                "{}: {} classes",
                path.display(),
                file_classes.len()
            );
            for class in file_classes {
                origins.entry(class.clone()).or_default().push(path.clone());
                classes.insert(class);
            }
        }

        Ok(ScanOutcome {
            classes,
            files_scanned: files.len(),
            origins,
        })
    }
}
