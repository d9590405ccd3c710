//! Core data types: project layout, dependency manifest, resolved flags and
//! session state.

pub mod flags;
pub mod layout;
pub mod manifest;
pub mod session;

pub use flags::{resolve_manifest, FlagSet, ResolvedFlags, ResolvedManifest};
pub use layout::ProjectLayout;
pub use manifest::{DependencyGraph, ManifestError};
pub use session::SessionState;
