//! Errors raised while starting a watch session.

use gkeep_core::KeepError;
use thiserror::Error;

/// Convenience type for session setup.
pub type Result<T> = std::result::Result<T, WatchError>;

/// Why a watch session could not be started.
#[derive(Error, Debug)]
pub enum WatchError {
    /// Scanning or inspecting the root failed.
    #[error(transparent)]
    Keep(#[from] KeepError),

    /// The OS watcher could not be set up.
    #[error("failed to watch root: {0}")]
    Notify(#[from] notify::Error),
}
