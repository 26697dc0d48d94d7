//! User-facing notices about marker changes.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::marker::MARKER_NAME;

/// Something the user should hear about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "directory", rename_all = "snake_case")]
pub enum Notice {
    /// A marker was written into this directory.
    MarkerCreated(PathBuf),
    /// A marker was deleted from this directory.
    MarkerRemoved(PathBuf),
}

impl Notice {
    /// The directory the notice is about.
    pub fn directory(&self) -> &Path {
        match self {
            Notice::MarkerCreated(dir) | Notice::MarkerRemoved(dir) => dir,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::MarkerCreated(dir) => {
                write!(f, "{} created in {}", MARKER_NAME, dir.display())
            }
            Notice::MarkerRemoved(dir) => {
                write!(f, "{} removed from {}", MARKER_NAME, dir.display())
            }
        }
    }
}

/// Receives notices as they happen.
///
/// Implementations must tolerate calls from several threads.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Sends notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        info!("{}", notice);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _notice: &Notice) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every notice for later inspection.
    #[derive(Default)]
    pub struct RecordingNotifier {
        seen: Mutex<Vec<Notice>>,
    }

    impl RecordingNotifier {
        pub fn notices(&self) -> Vec<Notice> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: &Notice) {
            self.seen.lock().unwrap().push(notice.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_user_messages() {
        let created = Notice::MarkerCreated(PathBuf::from("/repo/a"));
        let removed = Notice::MarkerRemoved(PathBuf::from("/repo/a"));

        assert_eq!(created.to_string(), ".gitkeep created in /repo/a");
        assert_eq!(removed.to_string(), ".gitkeep removed from /repo/a");
        assert_eq!(created.directory(), Path::new("/repo/a"));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(Notice::MarkerRemoved(PathBuf::from("x"))).unwrap();
        assert_eq!(json["kind"], "marker_removed");
        assert_eq!(json["directory"], "x");
    }
}
