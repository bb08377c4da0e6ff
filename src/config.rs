use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::args::Cli;
use crate::engine::ScanTarget;
use crate::errors::{Result, ScannerError};

const DEFAULT_OUTPUT: &str = "frontend/src/templates.js";

/// Optional JSON configuration file.
///
/// Everything here can also be given on the command line; CLI flags win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Extra attribute keywords recognized by the extractor.
    pub keywords: Vec<String>,

    /// Extra base tokens recognized in front of dot-notation chains.
    pub base_tokens: Vec<String>,

    /// Source extensions to scan.
    pub extensions: Vec<String>,

    /// Glob patterns to exclude.
    pub exclude: Vec<String>,

    /// Artifact destination, relative to the scan root.
    pub output: Option<PathBuf>,
}

impl FileConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScannerError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        serde_json::from_str(&content).map_err(|e| ScannerError::Config {
            message: format!("Failed to parse JSON config: {}", e),
        })
    }
}

/// Fully-resolved, immutable configuration for one invocation.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    pub output: PathBuf,
    pub ignore_file: Option<PathBuf>,
    pub use_ignore: bool,
    pub exclude: Vec<String>,
    pub extensions: Vec<String>,
    pub keywords: Vec<String>,
    pub base_tokens: Vec<String>,
    pub debounce: Duration,
    pub dry_run: bool,
}

impl ScannerConfig {
    /// Merge CLI arguments with the optional config file.
    pub fn from_args(cli: &Cli) -> Result<Self> {
        cli.validate().map_err(ScannerError::InvalidInput)?;

        let file = match &cli.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };

        let root = cli.dir.clone().unwrap_or_else(|| PathBuf::from("."));

        let output = cli
            .output
            .clone()
            .or(file.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        let output = if output.is_relative() {
            root.join(output)
        } else {
            output
        };

        let extensions = if !cli.ext.is_empty() {
            cli.ext.clone()
        } else if !file.extensions.is_empty() {
            file.extensions
        } else {
            vec!["py".to_string()]
        };

        let mut exclude = cli.exclude.clone();
        exclude.extend(file.exclude);

        Ok(Self {
            root,
            files: cli.files.clone(),
            output,
            ignore_file: cli.ignore_file.clone(),
            use_ignore: !cli.no_ignore,
            exclude,
            extensions,
            keywords: file.keywords,
            base_tokens: file.base_tokens,
            debounce: Duration::from_millis(cli.debounce_ms),
            dry_run: cli.dry_run,
        })
    }

    /// The scan targets for one invocation: explicit files when given,
    /// otherwise the whole root.
    pub fn targets(&self) -> Vec<ScanTarget> {
        if self.files.is_empty() {
            vec![ScanTarget::Root(self.root.clone())]
        } else {
            self.files
                .iter()
                .map(|f| {
                    let path = if f.is_relative() {
                        self.root.join(f)
                    } else {
                        f.clone()
                    };
                    ScanTarget::File(path)
                })
                .collect()
        }
    }
}
