//! gkeep Core - marker bookkeeping for empty directories
//!
//! Tools like git don't track empty directories. This crate keeps a
//! zero-byte `.gitkeep` in every directory that would otherwise be
//! empty, and takes it out again once the directory gains real content.
//!
//! There are two halves:
//! - [`scan_directory`] walks a tree once and seeds markers
//! - [`Reactor`] applies the same rules to individual create/delete events
//!
//! Neither keeps state between calls. The filesystem is the only source
//! of truth.
//!
//! # Example
//!
//! ```no_run
//! use gkeep_core::{scan_directory, LogNotifier, Reactor, ReactorOptions, ScanOptions};
//! use std::path::Path;
//!
//! let root = Path::new("./project");
//! scan_directory(root, &ScanOptions::default(), &LogNotifier).unwrap();
//!
//! let reactor = Reactor::new(root, ReactorOptions::default());
//! reactor.on_entry_created(&root.join("new_dir"), &LogNotifier).unwrap();
//! ```

pub mod error;
pub mod marker;
pub mod notice;
pub mod reactor;
pub mod scanner;

pub use error::{KeepError, Result};
pub use marker::{has_real_entries, list_entries, marker_path, MARKER_NAME};
pub use notice::{LogNotifier, Notice, Notifier, SilentNotifier};
pub use reactor::{Reactor, ReactorOptions};
pub use scanner::{scan_directory, ScanOptions, ScanReport};
