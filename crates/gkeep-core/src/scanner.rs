//! One-time scan of a tree.
//!
//! Walks every directory under the root and seeds a marker into each
//! one that has no entries at all. Run once, before event handling
//! starts, so the tree begins in a consistent state.

use crate::error::{KeepError, Result};
use crate::marker::{
    has_real_entries, is_directory, is_marker_name, list_entries, remove_marker, write_marker,
};
use crate::notice::{Notice, Notifier};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Options for a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Descend into symbolic links that point at directories.
    ///
    /// Each directory is then visited at most once, keyed by its
    /// canonical path, so link cycles terminate.
    pub follow_symlinks: bool,

    /// Remove markers from directories that have real entries.
    pub prune_stale: bool,
}

/// What a scan did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Directories whose listing was read.
    pub directories_visited: usize,

    /// Directories that received a new marker.
    pub markers_created: Vec<PathBuf>,

    /// Directories whose stale marker was pruned.
    pub markers_removed: Vec<PathBuf>,

    /// Time taken in milliseconds.
    pub duration_ms: u64,
}

impl ScanReport {
    /// True if the scan left the tree exactly as it found it.
    pub fn is_unchanged(&self) -> bool {
        self.markers_created.is_empty() && self.markers_removed.is_empty()
    }
}

/// Seeds markers into every empty directory under `root`.
///
/// Depth-first, using an explicit stack instead of recursion. Plain
/// files are never visited; they only prove their parent non-empty.
/// The first I/O failure aborts the whole scan.
///
/// # Example
///
/// ```no_run
/// use gkeep_core::{scan_directory, LogNotifier, ScanOptions};
/// use std::path::Path;
///
/// let report = scan_directory(Path::new("."), &ScanOptions::default(), &LogNotifier).unwrap();
/// println!("{} markers created", report.markers_created.len());
/// ```
pub fn scan_directory(
    root: &Path,
    options: &ScanOptions,
    notifier: &dyn Notifier,
) -> Result<ScanReport> {
    let start = Instant::now();
    let mut report = ScanReport::default();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut stack = vec![root.to_path_buf()];

    info!("Scanning {} for empty directories", root.display());

    while let Some(dir) = stack.pop() {
        if options.follow_symlinks {
            let real = fs::canonicalize(&dir).map_err(|e| KeepError::io(&dir, e))?;
            if !visited.insert(real) {
                debug!("Already visited {}, skipping", dir.display());
                continue;
            }
        }

        report.directories_visited += 1;
        let entries = list_entries(&dir)?;

        if entries.is_empty() {
            write_marker(&dir)?;
            notifier.notify(&Notice::MarkerCreated(dir.clone()));
            report.markers_created.push(dir);
            continue;
        }

        if options.prune_stale
            && has_real_entries(&entries)
            && entries.iter().any(|name| is_marker_name(name))
            && remove_marker(&dir)?
        {
            notifier.notify(&Notice::MarkerRemoved(dir.clone()));
            report.markers_removed.push(dir.clone());
        }

        // Pushed in reverse so children pop in listing order.
        for name in entries.iter().rev() {
            let child = dir.join(name);
            if is_directory(&child, options.follow_symlinks)? {
                debug!("Queueing {}", child.display());
                stack.push(child);
            }
        }
    }

    let duration = start.elapsed();
    report.duration_ms = duration.as_millis() as u64;

    info!(
        "Scanned {} directories, {} markers created, {} removed in {:?}",
        report.directories_visited,
        report.markers_created.len(),
        report.markers_removed.len(),
        duration
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::marker_path;
    use crate::notice::testing::RecordingNotifier;
    use crate::notice::SilentNotifier;
    use tempfile::tempdir;

    fn scan(root: &Path) -> ScanReport {
        scan_directory(root, &ScanOptions::default(), &SilentNotifier).unwrap()
    }

    #[test]
    fn test_empty_and_populated_siblings() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/file.txt"), "hi").unwrap();

        let report = scan(dir.path());

        assert!(dir.path().join("a/.gitkeep").exists());
        assert!(!dir.path().join("b/.gitkeep").exists());
        assert_eq!(report.markers_created, vec![dir.path().join("a")]);
        assert_eq!(report.directories_visited, 3);
    }

    #[test]
    fn test_empty_root_gets_marker() {
        let dir = tempdir().unwrap();
        let report = scan(dir.path());

        assert!(marker_path(dir.path()).exists());
        assert_eq!(report.markers_created.len(), 1);
    }

    #[test]
    fn test_nested_empty_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("x/y/z")).unwrap();
        fs::create_dir_all(dir.path().join("x/w")).unwrap();

        scan(dir.path());

        assert!(dir.path().join("x/y/z/.gitkeep").exists());
        assert!(dir.path().join("x/w/.gitkeep").exists());
        assert!(!dir.path().join("x/y/.gitkeep").exists());
        assert!(!dir.path().join("x/.gitkeep").exists());
        assert!(!dir.path().join(".gitkeep").exists());
    }

    #[test]
    fn test_second_scan_changes_nothing() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();
        fs::write(dir.path().join("c/readme.md"), "#").unwrap();

        let first = scan(dir.path());
        assert_eq!(first.markers_created.len(), 1);

        let second = scan(dir.path());
        assert!(second.is_unchanged());
    }

    #[test]
    fn test_notifies_each_created_marker() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        let notifier = RecordingNotifier::default();

        scan_directory(dir.path(), &ScanOptions::default(), &notifier).unwrap();

        assert_eq!(
            notifier.notices(),
            vec![Notice::MarkerCreated(dir.path().join("a"))]
        );
    }

    #[test]
    fn test_stale_marker_kept_without_prune() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/.gitkeep"), "").unwrap();
        fs::write(dir.path().join("a/code.rs"), "fn main() {}").unwrap();

        let report = scan(dir.path());

        assert!(dir.path().join("a/.gitkeep").exists());
        assert!(report.is_unchanged());
    }

    #[test]
    fn test_prune_removes_stale_marker() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/.gitkeep"), "").unwrap();
        fs::write(dir.path().join("a/code.rs"), "fn main() {}").unwrap();
        fs::create_dir(dir.path().join("lonely")).unwrap();
        fs::write(dir.path().join("lonely/.gitkeep"), "").unwrap();

        let options = ScanOptions {
            prune_stale: true,
            ..Default::default()
        };
        let report = scan_directory(dir.path(), &options, &SilentNotifier).unwrap();

        assert!(!dir.path().join("a/.gitkeep").exists());
        assert!(dir.path().join("lonely/.gitkeep").exists());
        assert_eq!(report.markers_removed, vec![dir.path().join("a")]);
    }

    #[test]
    fn test_missing_root_aborts() {
        let dir = tempdir().unwrap();
        let result = scan_directory(
            &dir.path().join("missing"),
            &ScanOptions::default(),
            &SilentNotifier,
        );
        assert!(matches!(result, Err(KeepError::IoError { .. })));
    }

    #[test]
    fn test_report_serializes() {
        let dir = tempdir().unwrap();
        let report = scan(dir.path());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["directories_visited"], 1);
        assert_eq!(json["markers_created"].as_array().unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_dir_not_followed_by_default() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        fs::create_dir(outside.path().join("empty")).unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        scan(dir.path());

        assert!(!outside.path().join("empty/.gitkeep").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_terminates_when_following() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/empty")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("a/back")).unwrap();

        let options = ScanOptions {
            follow_symlinks: true,
            ..Default::default()
        };
        let report = scan_directory(dir.path(), &options, &SilentNotifier).unwrap();

        assert!(dir.path().join("a/empty/.gitkeep").exists());
        assert_eq!(report.markers_created.len(), 1);
        assert_eq!(report.directories_visited, 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_does_not_abort_when_following() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("broken"))
            .unwrap();

        let options = ScanOptions {
            follow_symlinks: true,
            ..Default::default()
        };
        let report = scan_directory(dir.path(), &options, &SilentNotifier).unwrap();

        assert!(dir.path().join("empty/.gitkeep").exists());
        assert_eq!(report.markers_created, vec![dir.path().join("empty")]);
    }
}
