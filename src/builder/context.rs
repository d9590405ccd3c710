//! Build context - the immutable configuration a build runs against.
//!
//! A context is assembled once at startup (compiler located, manifest
//! resolved) and shared behind an `Arc`. Worker threads read it without
//! locking because it is never mutated; re-reading the manifest produces a
//! new context instead of editing the old one.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::toolchain::Toolchain;
use crate::builder::BuildError;
use crate::core::flags::{resolve_manifest, ResolvedManifest};
use crate::core::layout::ProjectLayout;
use crate::util::config::ToolchainSettings;
use crate::util::process::{path_with_prepended, ProcessBuilder};

/// Compiler, paths and resolved dependency flags for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub toolchain: Toolchain,

    /// Project root; relative manifest paths resolve against it
    pub root: PathBuf,

    /// Working directory for launched programs
    pub build_dir: PathBuf,

    pub manifest_path: PathBuf,

    pub output_executable: PathBuf,

    /// `None` until dependencies have been installed
    pub resolved: Option<ResolvedManifest>,
}

impl BuildContext {
    /// Create a context for `layout` with an already-located toolchain.
    pub fn new(layout: &ProjectLayout, toolchain: Toolchain) -> Result<Self, BuildError> {
        let resolved = resolve_manifest(&layout.manifest_path, &layout.root)?;
        if resolved.is_none() {
            tracing::info!(
                "dependency manifest {} not found; builds are disabled until it exists",
                layout.manifest_path.display()
            );
        }

        Ok(BuildContext {
            toolchain,
            root: layout.root.clone(),
            build_dir: layout.build_dir.clone(),
            manifest_path: layout.manifest_path.clone(),
            output_executable: layout.output_executable.clone(),
            resolved,
        })
    }

    /// Locate the compiler and resolve the manifest.
    pub fn from_layout(layout: &ProjectLayout, settings: &ToolchainSettings) -> Result<Self, BuildError> {
        let toolchain = Toolchain::locate(layout, settings)?;
        Self::new(layout, toolchain)
    }

    /// A copy of this context with the manifest read again.
    pub fn reresolve(&self) -> Result<Self, BuildError> {
        Ok(BuildContext {
            resolved: resolve_manifest(&self.manifest_path, &self.root)?,
            ..self.clone()
        })
    }

    /// Whether a runnable executable is present.
    pub fn can_run(&self) -> bool {
        self.output_executable.is_file()
    }

    /// Directories launched programs need on PATH: manifest bin dirs first,
    /// then the bundled toolchain.
    pub fn runtime_search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self
            .resolved
            .as_ref()
            .map(|r| r.bin_dirs.clone())
            .unwrap_or_default();
        dirs.push(self.toolchain.bin_dir.clone());
        dirs
    }

    /// The compiler invocation for `source`, or `None` without resolved
    /// flags.
    ///
    /// `compiler -o <exe> <source> <dependency flags> <extra flags>
    /// <static runtime flags>`, with the toolchain's bin dir ahead of PATH.
    pub fn compile_command(&self, source: &Path) -> Result<Option<ProcessBuilder>> {
        let Some(ref resolved) = self.resolved else {
            return Ok(None);
        };

        let cmd = ProcessBuilder::new(&self.toolchain.compiler)
            .arg("-o")
            .arg(&self.output_executable)
            .arg(source)
            .args(resolved.flags.iter())
            .args(&self.toolchain.extra_flags)
            .args(&self.toolchain.static_link_flags)
            .env("PATH", path_with_prepended([&self.toolchain.bin_dir])?);

        Ok(Some(cmd))
    }

    /// The invocation that starts the built program.
    pub fn launch_command(&self) -> Result<ProcessBuilder> {
        Ok(ProcessBuilder::new(&self.output_executable)
            .cwd(&self.build_dir)
            .env("PATH", path_with_prepended(self.runtime_search_dirs())?))
    }
}
