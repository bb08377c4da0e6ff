use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::errors::{Result, ScannerError};
use crate::extractor::ClassSet;

const HEADER: &str = "// Generated by tailwind-template-scanner - do not edit directly";

/// Serializes a class set into the generated JavaScript artifact that the
/// Tailwind content scanner reads.
///
/// The artifact is a pure function of the class set: sorted, deduplicated,
/// no timestamps, so identical inputs reproduce byte-identical output. An
/// empty set still renders a valid importable module.
pub struct ArtifactWriter {
    destination: PathBuf,
}

impl ArtifactWriter {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Render the artifact content for `classes`.
    pub fn render(classes: &ClassSet) -> String {
        let mut out = String::new();
        out.push_str(HEADER);
        out.push('\n');
        if classes.is_empty() {
            out.push_str("const templateClasses = [];\n");
        } else {
            out.push_str("const templateClasses = [\n");
            for class in classes {
                out.push_str("  \"");
                out.push_str(&escape_js(class));
                out.push_str("\",\n");
            }
            out.push_str("];\n");
        }
        out.push_str("\nexport default templateClasses;\n");
        out
    }

    /// Write the artifact for `classes`, replacing the destination wholesale.
    ///
    /// Content goes to a temporary file in the destination directory which is
    /// renamed into place on success; on any failure the temporary file is
    /// dropped and removed, so a partial artifact never lands at the
    /// destination.
    pub fn write(&self, classes: &ClassSet) -> Result<()> {
        let content = Self::render(classes);

        let parent = self
            .destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&parent).map_err(|e| self.write_error(e.to_string()))?;

        let mut tmp =
            NamedTempFile::new_in(&parent).map_err(|e| self.write_error(e.to_string()))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| self.write_error(e.to_string()))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| self.write_error(e.to_string()))?;
        tmp.persist(&self.destination)
            .map_err(|e| self.write_error(e.to_string()))?;

        info!(
            "wrote {} with {} unique classes",
            self.destination.display(),
            classes.len()
        );
        Ok(())
    }

    fn write_error(&self, message: String) -> ScannerError {
        ScannerError::Write {
            path: self.destination.display().to_string(),
            message,
        }
    }
}

fn escape_js(class: &str) -> String {
    let mut out = String::with_capacity(class.len());
    for ch in class.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out
}
