//! Command implementations

pub mod build;
pub mod completions;
pub mod doctor;
pub mod flags;
pub mod init;
pub mod run;
pub mod session;

use std::path::{Path, PathBuf};

use cxxpad::editor::{Prompt, SaveChoice};

/// Dialog answers for a non-interactive session.
///
/// Nothing is ever saved to a new location and nothing is discarded; the
/// build command only ever compiles files that already exist on disk.
pub struct NonInteractive;

impl Prompt for NonInteractive {
    fn save_path(&self, _initial_dir: &Path) -> Option<PathBuf> {
        None
    }

    fn confirm_save(&self, _name: &str) -> SaveChoice {
        SaveChoice::Cancel
    }

    fn confirm_quit(&self) -> bool {
        true
    }

    fn warn(&self, title: &str, message: &str) {
        eprintln!("warning: {}: {}", title, message);
    }
}
