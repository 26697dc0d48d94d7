//! Watch sessions.
//!
//! A session owns one root. Starting it scans the tree synchronously,
//! then attaches a watcher; from there on every event goes through the
//! reactor until the caller asks it to stop.

use crate::error::Result;
use crate::watcher::{FileWatcher, FsEvent};
use gkeep_core::{
    scan_directory, KeepError, Notice, Notifier, Reactor, ReactorOptions, ScanOptions, ScanReport,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Settings for one watch session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub scan: ScanOptions,
    pub reactor: ReactorOptions,

    /// How long to wait for an event before re-checking the stop flag.
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scan: ScanOptions::default(),
            reactor: ReactorOptions::default(),
            poll_interval: Duration::from_millis(200),
        }
    }
}

/// Counters for a finished session.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    /// Events delivered to the reactor.
    pub events_handled: usize,
    pub markers_created: usize,
    pub markers_removed: usize,
    /// Handlers that failed for reasons other than "not a directory".
    pub handler_failures: usize,
}

impl SessionStats {
    fn record(&mut self, notices: &[Notice]) {
        for notice in notices {
            match notice {
                Notice::MarkerCreated(_) => self.markers_created += 1,
                Notice::MarkerRemoved(_) => self.markers_removed += 1,
            }
        }
    }
}

/// A live watch over a single root.
pub struct WatchSession {
    root: PathBuf,
    reactor: Reactor,
    watcher: FileWatcher,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
}

impl WatchSession {
    /// Scans `root` and starts watching it.
    ///
    /// Returns the session along with the report from the initial scan.
    /// Changes made between the end of the scan and the watcher coming
    /// up are not seen.
    pub fn start(
        root: &Path,
        config: SessionConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<(Self, ScanReport)> {
        let root = fs::canonicalize(root).map_err(|e| KeepError::io(root, e))?;
        if !root.is_dir() {
            return Err(KeepError::NotADirectory(root).into());
        }

        let report = scan_directory(&root, &config.scan, notifier.as_ref())?;
        let watcher = FileWatcher::new(&root)?;

        let session = Self {
            reactor: Reactor::new(&root, config.reactor),
            root,
            watcher,
            notifier,
            poll_interval: config.poll_interval,
        };
        Ok((session, report))
    }

    /// The canonical root being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs the reactor for one event.
    pub fn handle(&self, event: &FsEvent) -> gkeep_core::Result<Vec<Notice>> {
        let notifier = self.notifier.as_ref();
        match event {
            FsEvent::Created(path) => self.reactor.on_entry_created(path, notifier),
            FsEvent::Deleted(path) => self.reactor.on_entry_deleted(path, notifier),
        }
    }

    /// Delivers events until `stop` is set.
    ///
    /// A failing handler only loses its own event; the loop keeps going.
    pub fn run(&self, stop: &AtomicBool) -> SessionStats {
        let mut stats = SessionStats::default();

        while !stop.load(Ordering::Relaxed) {
            let Some(event) = self.watcher.recv_timeout(self.poll_interval) else {
                continue;
            };

            stats.events_handled += 1;
            match self.handle(&event) {
                Ok(notices) => stats.record(&notices),
                Err(e) if e.is_not_a_directory() => debug!("{}", e),
                Err(e) => {
                    stats.handler_failures += 1;
                    warn!("Handling {} failed: {}", event.path().display(), e);
                }
            }
        }

        info!(
            "Stopped watching {} after {} events",
            self.root.display(),
            stats.events_handled
        );
        stats
    }
}
