//! C++ toolchain discovery.
//!
//! The compiler is located once per process. On Windows the project ships
//! its own MinGW under `vendor/mingw64/bin`; elsewhere `g++` is taken from
//! `PATH`. A `toolchain.compiler` config entry overrides both.

use std::path::{Path, PathBuf};

use crate::builder::BuildError;
use crate::core::layout::ProjectLayout;
use crate::util::config::ToolchainSettings;
use crate::util::process::find_executable;

/// Flags that link the GCC runtime statically so the produced executable
/// does not need `libgcc`/`libstdc++` DLLs next to it.
pub const STATIC_RUNTIME_FLAGS: [&str; 2] = ["-static-libgcc", "-static-libstdc++"];

/// A located compiler plus the settings that shape its invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Absolute path to the C++ compiler
    pub compiler: PathBuf,
    /// Bundled toolchain binaries, prepended to PATH for the compiler and
    /// for launched programs
    pub bin_dir: PathBuf,
    /// Flags appended after the dependency flags
    pub extra_flags: Vec<String>,
    /// Static runtime flags, always last on the command line
    pub static_link_flags: Vec<String>,
}

impl Toolchain {
    /// Create a toolchain for an already-known compiler.
    pub fn new(compiler: impl Into<PathBuf>, bin_dir: impl Into<PathBuf>) -> Self {
        Toolchain {
            compiler: compiler.into(),
            bin_dir: bin_dir.into(),
            extra_flags: Vec::new(),
            static_link_flags: STATIC_RUNTIME_FLAGS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Apply static-runtime and extra-flag settings.
    pub fn with_settings(mut self, settings: &ToolchainSettings) -> Self {
        self.extra_flags = settings.extra_flags().to_vec();
        if !settings.static_runtime() {
            self.static_link_flags.clear();
        }
        self
    }

    /// Locate the compiler for `layout`.
    ///
    /// Failing here is a configuration error for the whole run: without a
    /// compiler no build can ever start.
    pub fn locate(layout: &ProjectLayout, settings: &ToolchainSettings) -> Result<Self, BuildError> {
        let compiler = match settings.compiler {
            Some(ref configured) => resolve_configured(configured)?,
            None => default_compiler(layout)?,
        };

        tracing::debug!("using compiler {}", compiler.display());
        Ok(Toolchain::new(compiler, &layout.toolchain_bin_dir).with_settings(settings))
    }

    /// Whether the compiler binary is still present.
    pub fn compiler_exists(&self) -> bool {
        self.compiler.is_file()
    }
}

/// A configured compiler is used as a path when it has a directory part,
/// otherwise it is looked up on PATH.
fn resolve_configured(configured: &Path) -> Result<PathBuf, BuildError> {
    let has_dir = configured
        .parent()
        .is_some_and(|p| !p.as_os_str().is_empty());

    let found = if has_dir {
        configured.is_file().then(|| configured.to_path_buf())
    } else {
        find_executable(&configured.to_string_lossy())
    };

    found.ok_or_else(|| BuildError::CompilerNotFound {
        expected: configured.display().to_string(),
    })
}

#[cfg(windows)]
fn default_compiler(layout: &ProjectLayout) -> Result<PathBuf, BuildError> {
    let bundled = layout.toolchain_bin_dir.join("g++.exe");
    if bundled.is_file() {
        Ok(bundled)
    } else {
        Err(BuildError::CompilerNotFound {
            expected: bundled.display().to_string(),
        })
    }
}

#[cfg(not(windows))]
fn default_compiler(_layout: &ProjectLayout) -> Result<PathBuf, BuildError> {
    find_executable("g++").ok_or_else(|| BuildError::CompilerNotFound {
        expected: "g++ on PATH".to_string(),
    })
}
