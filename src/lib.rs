pub mod args;
pub mod artifact;
pub mod config;
pub mod engine;
pub mod errors;
pub mod extractor;
pub mod filter;
pub mod logging;
pub mod walker;
pub mod watch;

pub use args::{Cli, LogLevel};
pub use artifact::ArtifactWriter;
pub use config::{FileConfig, ScannerConfig};
pub use engine::{ScanEngine, ScanOutcome, ScanTarget};
pub use errors::{Result, ScannerError};
pub use extractor::{ClassExtractor, ClassSet};
pub use filter::PathFilter;
pub use walker::DirectoryWalker;
pub use watch::{
    spawn_fs_watcher, ChangeEvent, ChangeKind, DebounceMachine, WatchEvent, WatchLoop, WatchState,
};

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::info;

/// What one scan-and-write cycle did.
#[derive(Debug)]
pub struct ScanSummary {
    pub classes_found: usize,
    pub files_scanned: usize,
    pub output: PathBuf,
    pub wrote_artifact: bool,
}

/// Build the scan engine from a resolved configuration.
pub fn build_engine(config: &ScannerConfig) -> Result<ScanEngine> {
    let filter = PathFilter::new(
        &config.root,
        config.ignore_file.as_deref(),
        config.use_ignore,
        &config.exclude,
        config.extensions.clone(),
    )?;
    let extractor = ClassExtractor::new(&config.keywords, &config.base_tokens);
    Ok(ScanEngine::new(filter, extractor))
}

/// One-shot pipeline: scan all targets and regenerate the artifact.
pub fn run_scan(config: &ScannerConfig) -> Result<ScanSummary> {
    let engine = build_engine(config)?;
    let outcome = engine.scan(&config.targets())?;

    info!(
        "scanned {} files, {} unique classes",
        outcome.files_scanned,
        outcome.classes.len()
    );

    let wrote_artifact = !config.dry_run;
    if wrote_artifact {
        ArtifactWriter::new(config.output.clone()).write(&outcome.classes)?;
    }

    Ok(ScanSummary {
        classes_found: outcome.classes.len(),
        files_scanned: outcome.files_scanned,
        output: config.output.clone(),
        wrote_artifact,
    })
}

/// Watch pipeline: one initial scan-and-write, then regenerate on change
/// until ctrl-c.
pub async fn run_watch(config: ScannerConfig) -> Result<()> {
    // The initial cycle keeps one-shot semantics: a missing root or a failed
    // write is fatal before watching begins.
    run_scan(&config)?;

    let (tx, rx) = mpsc::unbounded_channel();
    let _watcher = spawn_fs_watcher(&config.root, tx.clone())?;

    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {err}");
        }
        let _ = tx.send(WatchEvent::Shutdown);
    });

    let engine = build_engine(&config)?;
    let writer = ArtifactWriter::new(config.output.clone());
    let targets = config.targets();

    WatchLoop::new(engine, writer, targets, config.debounce, rx)
        .run()
        .await
}
