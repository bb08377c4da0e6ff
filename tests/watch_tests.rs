use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tailwind_template_scanner::{
    ArtifactWriter, ChangeEvent, ChangeKind, ClassExtractor, PathFilter, ScanEngine, ScanTarget,
    WatchEvent, WatchLoop,
};
use tempfile::tempdir;
use tokio::sync::mpsc;

const QUIET: Duration = Duration::from_millis(100);

fn loop_for(
    root: &Path,
    output: &Path,
    targets: Vec<ScanTarget>,
) -> (WatchLoop, mpsc::UnboundedSender<WatchEvent>) {
    let filter = PathFilter::new(root, None, true, &[], vec!["py".to_string()]).unwrap();
    let engine = ScanEngine::new(filter, ClassExtractor::default());
    let writer = ArtifactWriter::new(output);
    let (tx, rx) = mpsc::unbounded_channel();
    let watch_loop = WatchLoop::new(engine, writer, targets, QUIET, rx);
    (watch_loop, tx)
}

fn modified(path: PathBuf) -> WatchEvent {
    WatchEvent::Change(ChangeEvent {
        path,
        kind: ChangeKind::Modified,
    })
}

#[tokio::test(start_paused = true)]
async fn test_change_event_triggers_regeneration() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("page.py");
    fs::write(&page, "div('.flex')").unwrap();
    let output = dir.path().join("templates.js");

    let (watch_loop, tx) = loop_for(
        dir.path(),
        &output,
        vec![ScanTarget::Root(dir.path().to_path_buf())],
    );
    let handle = tokio::spawn(watch_loop.run());

    tx.send(modified(page)).unwrap();
    tokio::time::sleep(QUIET * 2).await;

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("\"flex\""));

    tx.send(WatchEvent::Shutdown).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_burst_coalesces_and_deadline_resets() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("page.py");
    fs::write(&page, "div('.gap-2')").unwrap();
    let output = dir.path().join("templates.js");

    let (watch_loop, tx) = loop_for(
        dir.path(),
        &output,
        vec![ScanTarget::Root(dir.path().to_path_buf())],
    );
    let handle = tokio::spawn(watch_loop.run());

    // Two rapid events: the second lands before the first quiet period ends,
    // so no artifact exists at the original deadline.
    tx.send(modified(page.clone())).unwrap();
    tokio::time::sleep(QUIET / 2).await;
    tx.send(modified(page)).unwrap();
    tokio::time::sleep(QUIET * 3 / 4).await;
    assert!(!output.exists(), "scan ran before the reset deadline");

    tokio::time::sleep(QUIET).await;
    assert!(output.exists(), "coalesced scan never ran");

    tx.send(WatchEvent::Shutdown).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_artifact_changes_do_not_retrigger() {
    let dir = tempdir().unwrap();
    // Artifact deliberately carries a scannable extension so only the
    // destination check can suppress it.
    let output = dir.path().join("templates.py");

    let (watch_loop, tx) = loop_for(
        dir.path(),
        &output,
        vec![ScanTarget::Root(dir.path().to_path_buf())],
    );
    let handle = tokio::spawn(watch_loop.run());

    tx.send(modified(output.clone())).unwrap();
    tx.send(modified(dir.path().join("notes.txt")))
        .unwrap();
    tokio::time::sleep(QUIET * 3).await;
    assert!(!output.exists(), "irrelevant events triggered a scan");

    tx.send(WatchEvent::Shutdown).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_loop_survives_scan_failure() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("page.py");
    fs::write(&page, "div('.mx-4')").unwrap();
    let output = dir.path().join("templates.js");

    // Explicit file target so deleting the file makes the scan fail.
    let (watch_loop, tx) = loop_for(dir.path(), &output, vec![ScanTarget::File(page.clone())]);
    let handle = tokio::spawn(watch_loop.run());

    fs::remove_file(&page).unwrap();
    tx.send(modified(page.clone())).unwrap();
    tokio::time::sleep(QUIET * 2).await;
    assert!(!output.exists());

    // The loop is back in Idle and a later change still regenerates.
    fs::write(&page, "div('.recovered')").unwrap();
    tx.send(modified(page)).unwrap();
    tokio::time::sleep(QUIET * 2).await;

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("\"recovered\""));

    tx.send(WatchEvent::Shutdown).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_during_debounce_terminates() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("page.py");
    fs::write(&page, "div('.flex')").unwrap();
    let output = dir.path().join("templates.js");

    let (watch_loop, tx) = loop_for(
        dir.path(),
        &output,
        vec![ScanTarget::Root(dir.path().to_path_buf())],
    );
    let handle = tokio::spawn(watch_loop.run());

    tx.send(modified(page)).unwrap();
    tx.send(WatchEvent::Shutdown).unwrap();
    handle.await.unwrap().unwrap();

    // Shutdown won the race against the quiet period.
    assert!(!output.exists());
}

#[tokio::test(start_paused = true)]
async fn test_closed_channel_terminates_loop() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("templates.js");

    let (watch_loop, tx) = loop_for(
        dir.path(),
        &output,
        vec![ScanTarget::Root(dir.path().to_path_buf())],
    );
    let handle = tokio::spawn(watch_loop.run());

    drop(tx);
    handle.await.unwrap().unwrap();
}
