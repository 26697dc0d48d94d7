//! Marker file helpers.
//!
//! Every decision is made from a fresh directory listing. Nothing about
//! the tree is cached between calls, so a stale view can only last as
//! long as a single handler runs.

use crate::error::{KeepError, Result};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reserved name of the placeholder file.
pub const MARKER_NAME: &str = ".gitkeep";

/// Where the marker for `dir` lives.
pub fn marker_path(dir: &Path) -> PathBuf {
    dir.join(MARKER_NAME)
}

/// Returns true if `name` is the marker's file name.
pub fn is_marker_name(name: &OsStr) -> bool {
    name == OsStr::new(MARKER_NAME)
}

/// Lists the names of the direct children of `dir`.
///
/// Order is whatever the filesystem returns.
pub fn list_entries(dir: &Path) -> Result<Vec<OsString>> {
    let reader = fs::read_dir(dir).map_err(|e| KeepError::io(dir, e))?;

    let mut names = Vec::new();
    for entry in reader {
        let entry = entry.map_err(|e| KeepError::io(dir, e))?;
        names.push(entry.file_name());
    }
    Ok(names)
}

/// Whether a listing contains anything besides the marker.
///
/// A directory holding only the marker is still logically empty.
pub fn has_real_entries(entries: &[OsString]) -> bool {
    match entries {
        [] => false,
        [only] => !is_marker_name(only),
        _ => true,
    }
}

/// Checks whether `path` is a directory.
///
/// Without `follow_symlinks` a link to a directory counts as a plain
/// entry and is never descended into. With it, a dangling link is
/// simply not a directory.
pub fn is_directory(path: &Path, follow_symlinks: bool) -> Result<bool> {
    if !follow_symlinks {
        return fs::symlink_metadata(path)
            .map(|m| m.is_dir())
            .map_err(|e| KeepError::io(path, e));
    }

    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) if e.kind() == ErrorKind::NotFound && fs::symlink_metadata(path).is_ok() => {
            Ok(false)
        }
        Err(e) => Err(KeepError::io(path, e)),
    }
}

/// Writes a zero-byte marker into `dir`, truncating any existing one.
pub fn write_marker(dir: &Path) -> Result<PathBuf> {
    let path = marker_path(dir);
    fs::write(&path, b"").map_err(|e| KeepError::io(&path, e))?;
    Ok(path)
}

/// Deletes the marker in `dir` if there is one.
///
/// Returns whether a marker was actually removed. A marker that
/// disappears before we get to it counts as already handled.
pub fn remove_marker(dir: &Path) -> Result<bool> {
    let path = marker_path(dir);
    match fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(KeepError::io(path, e)),
    }
}
