use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Tailwind Template Scanner - extracts Tailwind classes from htpy-style
/// Python templates and regenerates the content-scanner artifact
#[derive(Parser, Debug, Clone)]
#[command(name = "tailwind-template-scanner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory root to scan
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "PATH",
        help = "Base directory to scan for template files (defaults to the current directory)"
    )]
    pub dir: Option<PathBuf>,

    /// Specific template files to scan instead of walking the whole root
    #[arg(
        short = 'f',
        long = "files",
        value_name = "PATH",
        num_args = 1..,
        help = "Explicit template files to scan, relative to --dir"
    )]
    pub files: Vec<PathBuf>,

    /// Output artifact path
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Path of the generated artifact, relative to --dir (default: frontend/src/templates.js)"
    )]
    pub output: Option<PathBuf>,

    /// Configuration file path (JSON)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        help = "Path to configuration file (JSON format)"
    )]
    pub config: Option<PathBuf>,

    /// Ignore-rule file
    #[arg(
        long = "ignore-file",
        value_name = "PATH",
        help = "Gitignore-style rule file (default: .gitignore under --dir)"
    )]
    pub ignore_file: Option<PathBuf>,

    /// Disable ignore-rule matching
    #[arg(
        long = "no-ignore",
        default_value_t = false,
        help = "Scan files even when ignore rules would exclude them"
    )]
    pub no_ignore: bool,

    /// Exclude patterns (glob patterns to exclude)
    #[arg(
        short = 'e',
        long = "exclude",
        value_name = "PATTERN",
        num_args = 0..,
        help = "Glob patterns to exclude from scanning"
    )]
    pub exclude: Vec<String>,

    /// Source extensions to scan
    #[arg(
        long = "ext",
        value_name = "EXT",
        num_args = 0..,
        help = "Source file extensions to scan (default: py)"
    )]
    pub ext: Vec<String>,

    /// Watch mode (continuously watch for changes)
    #[arg(
        short = 'w',
        long = "watch",
        default_value_t = false,
        help = "Watch for file changes and regenerate the artifact automatically"
    )]
    pub watch: bool,

    /// Quiet period for change coalescing
    #[arg(
        long = "debounce-ms",
        value_name = "MS",
        default_value_t = 500,
        help = "Milliseconds of quiet after a change burst before rescanning"
    )]
    pub debounce_ms: u64,

    /// Dry run (don't write the artifact)
    #[arg(
        long = "dry-run",
        default_value_t = false,
        help = "Perform the scan but don't write the artifact"
    )]
    pub dry_run: bool,

    /// Log verbosity
    #[arg(
        long = "log-level",
        value_enum,
        value_name = "LEVEL",
        help = "Log level (falls back to TEMPLATE_SCANNER_LOG, then info)"
    )]
    pub log_level: Option<LogLevel>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Cli {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.debounce_ms == 0 {
            return Err("Debounce period must be at least 1 millisecond".to_string());
        }

        if self.watch && self.dry_run {
            return Err("--watch and --dry-run cannot be combined".to_string());
        }

        if self.ext.iter().any(|e| e.starts_with('.')) {
            return Err("Extensions must be given without a leading dot".to_string());
        }

        Ok(())
    }
}
