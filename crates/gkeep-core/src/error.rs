//! Error types for marker maintenance.
//!
//! Nothing here is retried or swallowed. A failure aborts whatever
//! operation hit it (a whole scan, or a single event handler).

use std::path::PathBuf;
use thiserror::Error;

/// Convenience type for marker operations.
pub type Result<T> = std::result::Result<T, KeepError>;

/// Things that can go wrong while keeping markers in place.
#[derive(Error, Debug)]
pub enum KeepError {
    /// A filesystem read, write or delete failed.
    #[error("filesystem error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path was expected to be a directory but isn't. Happens every
    /// time a plain file is created, since the seeding rule lists the
    /// new entry as if it were a directory.
    #[error("not a directory: '{0}'")]
    NotADirectory(PathBuf),
}

impl KeepError {
    /// Creates an IO error with the path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// True when the failure only says "this entry is not a directory".
    pub fn is_not_a_directory(&self) -> bool {
        matches!(self, Self::NotADirectory(_))
    }
}
