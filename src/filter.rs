use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::warn;

use crate::errors::Result;

/// Decides whether a path participates in a scan.
///
/// A file is scanned when it carries a source extension, is not hidden, and
/// matches neither the gitignore-style rules nor any exclude glob. Hidden
/// directories (which covers VCS metadata like `.git`) are never descended
/// into, even without explicit ignore rules.
#[derive(Debug)]
pub struct PathFilter {
    root: PathBuf,
    gitignore: Option<Gitignore>,
    exclude: Vec<glob::Pattern>,
    extensions: Vec<String>,
}

impl PathFilter {
    /// Build a filter rooted at `root`.
    ///
    /// `ignore_file` defaults to `<root>/.gitignore`; a missing or unreadable
    /// rule file means "no rules", not an error. `use_ignore: false` disables
    /// ignore-rule matching entirely.
    pub fn new(
        root: &Path,
        ignore_file: Option<&Path>,
        use_ignore: bool,
        exclude: &[String],
        extensions: Vec<String>,
    ) -> Result<Self> {
        let gitignore = if use_ignore {
            let rules = ignore_file
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| root.join(".gitignore"));
            load_ignore_rules(root, &rules)
        } else {
            None
        };

        let exclude = exclude
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            root: root.to_path_buf(),
            gitignore,
            exclude,
            extensions,
        })
    }

    /// Should this file be read and extracted from?
    pub fn should_scan(&self, path: &Path) -> bool {
        if is_hidden(path) {
            return false;
        }
        if !self.has_source_extension(path) {
            return false;
        }
        !self.is_ignored(path, false) && !self.is_excluded(path)
    }

    /// Should the walker descend into this directory?
    pub fn should_descend(&self, dir: &Path) -> bool {
        if is_hidden(dir) {
            return false;
        }
        !self.is_ignored(dir, true) && !self.is_excluded(dir)
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.iter().any(|e| e == ext),
            None => false,
        }
    }

    fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        let Some(gitignore) = &self.gitignore else {
            return false;
        };
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        gitignore
            .matched_path_or_any_parents(rel, is_dir)
            .is_ignore()
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.iter().any(|p| p.matches_path(path))
    }
}

fn load_ignore_rules(root: &Path, rules: &Path) -> Option<Gitignore> {
    if !rules.exists() {
        return None;
    }
    let mut builder = GitignoreBuilder::new(root);
    if let Some(err) = builder.add(rules) {
        warn!(
            "ignore rules at {} are unreadable, scanning without them: {err}",
            rules.display()
        );
        return None;
    }
    match builder.build() {
        Ok(gitignore) => Some(gitignore),
        Err(err) => {
            warn!(
                "failed to compile ignore rules from {}: {err}",
                rules.display()
            );
            None
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}
