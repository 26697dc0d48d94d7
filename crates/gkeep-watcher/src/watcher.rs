//! File watcher for live updates.
//!
//! Uses the notify crate to watch the root recursively and boils its
//! events down to the two kinds the reactor cares about.

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;
use tracing::{debug, info, warn};

/// A filesystem change under the watched root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    Created(PathBuf),
    Deleted(PathBuf),
}

impl FsEvent {
    /// The affected path.
    pub fn path(&self) -> &Path {
        match self {
            FsEvent::Created(path) | FsEvent::Deleted(path) => path,
        }
    }
}

/// Translates one notify event into zero or more [`FsEvent`]s.
///
/// A rename shows up as the old path going away and the new one
/// appearing, so a directory moved into the tree is treated like a
/// freshly created one.
pub fn translate(event: Event) -> Vec<FsEvent> {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            event.paths.into_iter().map(FsEvent::Created).collect()
        }
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            event.paths.into_iter().map(FsEvent::Deleted).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut paths = event.paths.into_iter();
            match (paths.next(), paths.next()) {
                (Some(from), Some(to)) => vec![FsEvent::Deleted(from), FsEvent::Created(to)],
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

fn forward(tx: &Sender<FsEvent>, res: Result<Event, notify::Error>) {
    match res {
        Ok(event) => {
            for change in translate(event) {
                debug!("{:?}", change);
                if tx.send(change).is_err() {
                    warn!("Failed to send filesystem event");
                }
            }
        }
        Err(e) => warn!("Watch error: {}", e),
    }
}

/// Watches a directory tree for creations and deletions.
pub struct FileWatcher {
    #[allow(dead_code)]
    watcher: notify::RecommendedWatcher,
    receiver: Receiver<FsEvent>,
    #[cfg(test)]
    sender: Sender<FsEvent>,
}

impl FileWatcher {
    /// Creates a new recursive watcher for the given root.
    ///
    /// Dropping the watcher stops event delivery.
    pub fn new(root: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = channel();
        #[cfg(test)]
        let sender = tx.clone();

        let mut watcher =
            notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
                forward(&tx, res)
            })?;

        watcher.watch(root, RecursiveMode::Recursive)?;

        info!("Watching {} for changes", root.display());

        Ok(Self {
            watcher,
            receiver: rx,
            #[cfg(test)]
            sender,
        })
    }

    /// Polls for changes.
    ///
    /// Returns immediately with any pending events.
    pub fn poll(&self) -> Vec<FsEvent> {
        self.receiver.try_iter().collect()
    }

    /// Waits for the next event with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FsEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Handle for queueing synthetic events alongside real ones.
    #[cfg(test)]
    pub(crate) fn sender(&self) -> Sender<FsEvent> {
        self.sender.clone()
    }
}
