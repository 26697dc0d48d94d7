//! gkeep Watcher - live marker maintenance
//!
//! This crate handles the long-running side of things:
//! - Watching a root recursively for creations and deletions
//! - Running the initial scan before events are attached
//! - Feeding each event through the reactor until told to stop

mod error;
mod session;
mod watcher;

pub use error::{Result, WatchError};
pub use session::{SessionConfig, SessionStats, WatchSession};
pub use watcher::{translate, FileWatcher, FsEvent};
