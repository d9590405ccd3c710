//! Compilation orchestration: toolchain discovery, the background build
//! worker, the program launcher and the event channel they report through.

pub mod context;
pub mod diagnostics;
pub mod events;
pub mod executor;
pub mod launcher;
pub mod orchestrator;
pub mod output;
pub mod toolchain;

use thiserror::Error;

use crate::core::manifest::ManifestError;

pub use context::BuildContext;
pub use events::{BuildEvent, BuildState};
pub use executor::{CompilationResult, ProcessExecutor, SystemExecutor};
pub use launcher::{LaunchOutcome, Launcher};
pub use orchestrator::{BuildRequest, Orchestrator};
pub use output::{OutputBuffer, OutputSink, Reporter};
pub use toolchain::Toolchain;

/// Configuration errors that make the builder unusable.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("compiler not found: {expected}\nhelp: install g++ and make sure it is on PATH, or set `toolchain.compiler` in .cxxpad/config.toml")]
    CompilerNotFound { expected: String },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}
