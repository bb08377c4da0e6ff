use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::artifact::ArtifactWriter;
use crate::engine::{ScanEngine, ScanTarget};
use crate::errors::{Result, ScannerError};

/// What happened to a path on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
    Renamed,
}

/// A single filesystem notification, as consumed by the watch loop.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Everything the watch loop reacts to. Shutdown travels on the same channel
/// as change events so the loop has a single suspension point.
#[derive(Debug)]
pub enum WatchEvent {
    Change(ChangeEvent),
    Shutdown,
}

/// States of the watch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Debouncing { deadline: Instant },
    Scanning,
    Terminated,
}

/// Pure debounce state machine: Idle -> Debouncing -> Scanning -> Idle, with
/// Terminated reachable from every state.
///
/// Change events during Debouncing push the deadline out rather than firing,
/// so a burst of events coalesces into one scan cycle. The machine does no
/// I/O and keeps no timers of its own; the driver supplies `Instant`s.
#[derive(Debug)]
pub struct DebounceMachine {
    quiet: Duration,
    state: WatchState,
}

impl DebounceMachine {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            state: WatchState::Idle,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// The instant at which the quiet period elapses, if debouncing.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            WatchState::Debouncing { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// A change event was observed at `now`.
    pub fn note_event(&mut self, now: Instant) {
        match self.state {
            WatchState::Idle | WatchState::Debouncing { .. } => {
                self.state = WatchState::Debouncing {
                    deadline: now + self.quiet,
                };
            }
            WatchState::Scanning | WatchState::Terminated => {}
        }
    }

    /// The quiet period elapsed. Returns true if a scan cycle should run.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.state {
            WatchState::Debouncing { deadline } if now >= deadline => {
                self.state = WatchState::Scanning;
                true
            }
            _ => false,
        }
    }

    /// The scan-and-write cycle finished (successfully or not).
    pub fn scan_complete(&mut self) {
        if self.state == WatchState::Scanning {
            self.state = WatchState::Idle;
        }
    }

    /// External stop signal; Terminated is final.
    pub fn terminate(&mut self) {
        self.state = WatchState::Terminated;
    }
}

/// Keeps the underlying `notify` watcher alive; dropping the handle stops
/// file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `root` recursively and forward change events into `tx`.
pub fn spawn_fs_watcher(
    root: &Path,
    tx: mpsc::UnboundedSender<WatchEvent>,
) -> Result<WatcherHandle> {
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let Some(kind) = map_kind(&event.kind) else {
                    return;
                };
                for path in event.paths {
                    // A closed channel just means the loop already stopped.
                    let _ = tx.send(WatchEvent::Change(ChangeEvent { path, kind }));
                }
            }
            Err(err) => {
                eprintln!("tailwind-template-scanner: file watch error: {err}");
            }
        },
        Config::default(),
    )
    .map_err(|e| ScannerError::Watch(e.to_string()))?;

    watcher
        .watch(root, RecursiveMode::Recursive)
        .map_err(|e| ScannerError::Watch(e.to_string()))?;

    info!("file watcher started on {}", root.display());
    Ok(WatcherHandle { _inner: watcher })
}

fn map_kind(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Modify(notify::event::ModifyKind::Name(_)) => Some(ChangeKind::Renamed),
        EventKind::Modify(_) => Some(ChangeKind::Modified),
        EventKind::Remove(_) => Some(ChangeKind::Deleted),
        _ => None,
    }
}

/// Event-driven re-scan loop.
///
/// Suspends on its event channel, coalesces bursts through the
/// `DebounceMachine`, and runs one scan-and-write cycle at a time. Scan and
/// write failures are reported and the loop returns to Idle; only the
/// shutdown event (or channel closure) ends it.
pub struct WatchLoop {
    engine: ScanEngine,
    writer: ArtifactWriter,
    targets: Vec<ScanTarget>,
    machine: DebounceMachine,
    events: mpsc::UnboundedReceiver<WatchEvent>,
}

impl WatchLoop {
    pub fn new(
        engine: ScanEngine,
        writer: ArtifactWriter,
        targets: Vec<ScanTarget>,
        quiet: Duration,
        events: mpsc::UnboundedReceiver<WatchEvent>,
    ) -> Self {
        Self {
            engine,
            writer,
            targets,
            machine: DebounceMachine::new(quiet),
            events,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        info!("watch loop started");
        loop {
            let deadline = self.machine.deadline();
            // Placeholder keeps the sleep arm well-formed while disabled.
            let sleep_at = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                maybe = self.events.recv() => match maybe {
                    Some(WatchEvent::Change(event)) => {
                        if self.is_relevant(&event) {
                            debug!("change observed: {:?} {}", event.kind, event.path.display());
                            self.machine.note_event(tokio::time::Instant::now().into_std());
                        }
                    }
                    Some(WatchEvent::Shutdown) | None => {
                        self.machine.terminate();
                        break;
                    }
                },
                _ = tokio::time::sleep_until(tokio::time::Instant::from_std(sleep_at)), if deadline.is_some() => {
                    if self.machine.fire(tokio::time::Instant::now().into_std()) {
                        self.run_cycle();
                        self.machine.scan_complete();
                    }
                }
            }
        }
        info!("watch loop terminated");
        Ok(())
    }

    /// One scan-and-write cycle. Failures here must not kill the loop.
    fn run_cycle(&self) {
        match self.engine.scan(&self.targets) {
            Ok(outcome) => {
                if let Err(err) = self.writer.write(&outcome.classes) {
                    error!("artifact write failed, continuing to watch: {err}");
                }
            }
            Err(err) => {
                warn!("scan failed, continuing to watch: {err}");
            }
        }
    }

    /// Events about the artifact itself or filtered-out paths never trigger
    /// a rescan; regenerating the artifact must not re-trigger the loop.
    fn is_relevant(&self, event: &ChangeEvent) -> bool {
        if event.path == *self.writer.destination() {
            return false;
        }
        self.engine.filter().should_scan(&event.path)
    }
}
