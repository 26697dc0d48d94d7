//! Incremental marker rules applied to filesystem events.
//!
//! The reactor keeps no model of the tree. Each handler re-reads the
//! directories it cares about, so replaying an event or running two
//! handlers at once still converges on the same on-disk state.

use crate::error::{KeepError, Result};
use crate::marker::{has_real_entries, is_directory, list_entries, remove_marker, write_marker};
use crate::notice::{Notice, Notifier};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options for event handling.
#[derive(Debug, Clone, Default)]
pub struct ReactorOptions {
    /// Re-seed a marker when a deletion leaves its parent empty.
    ///
    /// Off by default: deletions are observed but trigger nothing, so
    /// emptying a directory does not bring its marker back.
    pub reseed_on_delete: bool,

    /// Treat a newly created link to a directory as a directory, so it
    /// gets seeded the same way the scan would seed it.
    pub follow_symlinks: bool,
}

/// Applies the marker rules for one watched root.
#[derive(Debug, Clone)]
pub struct Reactor {
    root: PathBuf,
    options: ReactorOptions,
}

impl Reactor {
    /// Creates a reactor for the tree under `root`.
    pub fn new(root: impl Into<PathBuf>, options: ReactorOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// The watched root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Handles a newly created entry.
    ///
    /// First drops the parent's marker if the parent now has real
    /// entries, then seeds a marker into `path` if it is an empty
    /// directory. The seeding step fails with
    /// [`KeepError::NotADirectory`] for anything that isn't a directory;
    /// by then the parent has already been taken care of.
    pub fn on_entry_created(&self, path: &Path, notifier: &dyn Notifier) -> Result<Vec<Notice>> {
        let mut notices = Vec::new();

        if let Some(notice) = self.drop_parent_marker(path)? {
            notifier.notify(&notice);
            notices.push(notice);
        }

        if let Some(notice) = self.seed_new_directory(path)? {
            notifier.notify(&notice);
            notices.push(notice);
        }

        Ok(notices)
    }

    /// Handles a deleted entry.
    ///
    /// Does nothing unless [`ReactorOptions::reseed_on_delete`] is set.
    pub fn on_entry_deleted(&self, path: &Path, notifier: &dyn Notifier) -> Result<Vec<Notice>> {
        if !self.options.reseed_on_delete {
            debug!("Ignoring deletion of {}", path.display());
            return Ok(Vec::new());
        }

        let Some(parent) = path.parent() else {
            return Ok(Vec::new());
        };

        // Never touch anything above the root, and skip parents that
        // went away together with their children.
        if !parent.starts_with(&self.root) || !parent.is_dir() {
            return Ok(Vec::new());
        }

        if !list_entries(parent)?.is_empty() {
            return Ok(Vec::new());
        }

        write_marker(parent)?;
        let notice = Notice::MarkerCreated(parent.to_path_buf());
        notifier.notify(&notice);
        Ok(vec![notice])
    }

    fn drop_parent_marker(&self, path: &Path) -> Result<Option<Notice>> {
        let Some(parent) = path.parent() else {
            return Ok(None);
        };

        let entries = list_entries(parent)?;
        if !has_real_entries(&entries) {
            return Ok(None);
        }

        if remove_marker(parent)? {
            Ok(Some(Notice::MarkerRemoved(parent.to_path_buf())))
        } else {
            Ok(None)
        }
    }

    fn seed_new_directory(&self, path: &Path) -> Result<Option<Notice>> {
        if !is_directory(path, self.options.follow_symlinks)? {
            return Err(KeepError::NotADirectory(path.to_path_buf()));
        }

        if !list_entries(path)?.is_empty() {
            return Ok(None);
        }

        write_marker(path)?;
        Ok(Some(Notice::MarkerCreated(path.to_path_buf())))
    }
}
