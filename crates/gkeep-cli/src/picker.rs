//! Choosing the root folder.
//!
//! An explicit path wins. Otherwise a native folder dialog is shown when
//! the binary was built with the `gui` feature.

use std::path::PathBuf;
use thiserror::Error;

/// Problems with the user's choice of folder.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PickError {
    #[error("No folder selected!")]
    NoFolderSelected,
}

/// Shows a directories-only, single-selection dialog.
#[cfg(feature = "gui")]
pub fn pick_folder() -> Option<PathBuf> {
    rfd::FileDialog::new().set_title("Select Folder").pick_folder()
}

#[cfg(not(feature = "gui"))]
pub fn pick_folder() -> Option<PathBuf> {
    tracing::debug!("Built without the `gui` feature, no folder dialog available");
    None
}

/// Returns the root to work on, asking the user if none was given.
pub fn resolve_root(path: Option<PathBuf>) -> Result<PathBuf, PickError> {
    path.or_else(pick_folder).ok_or(PickError::NoFolderSelected)
}
