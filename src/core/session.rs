//! Editor session persistence.
//!
//! The session file records which files were open and which one was
//! focused. It is read once at startup and written once at shutdown; a
//! missing or corrupt file simply means there is no previous session.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::util::fs::write_atomic;

/// Open files and the focused file, as persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub open_files: Vec<PathBuf>,
    #[serde(default)]
    pub active_file: Option<PathBuf>,
}

impl SessionState {
    pub fn new(open_files: Vec<PathBuf>, active_file: Option<PathBuf>) -> Self {
        SessionState {
            open_files,
            active_file,
        }
    }

    /// Whether the session has anything worth restoring.
    pub fn is_empty(&self) -> bool {
        self.open_files.is_empty()
    }

    /// Load the session from `path`.
    ///
    /// Returns `None` if the file is missing, unreadable or malformed.
    pub fn load(path: &Path) -> Option<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read session file {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(
                    "Failed to load session from {}, the file may be corrupt: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }

    /// Save the session to `path`. Failures are logged, not returned.
    pub fn save(&self, path: &Path) {
        let result = serde_json::to_string_pretty(self)
            .map_err(anyhow::Error::from)
            .and_then(|json| write_atomic(path, &json));

        match result {
            Ok(()) => tracing::debug!("session saved to {}", path.display()),
            Err(e) => tracing::warn!("Failed to save session to {}: {:#}", path.display(), e),
        }
    }
}
