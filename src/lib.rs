//! cxxpad - a small C++ scratchpad build tool
//!
//! This crate provides the library behind the `cxxpad` CLI: reading the
//! Conan dependency manifest into compiler flags, compiling a single source
//! file on a background worker, launching the result, and the headless
//! editor state (open buffers and session) around it.

pub mod builder;
pub mod core;
pub mod editor;
pub mod ops;
pub mod util;

/// Test utilities and mocks for cxxpad unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides mock implementations for process execution,
/// the output surface and user dialogs.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildContext, BuildEvent, BuildState, Orchestrator};
pub use core::{
    flags::{ResolvedFlags, ResolvedManifest},
    layout::ProjectLayout,
    manifest::DependencyGraph,
    session::SessionState,
};
pub use editor::{BufferSet, Prompt};
pub use util::context::GlobalContext;
