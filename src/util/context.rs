//! Global context for cxxpad operations.
//!
//! Provides centralized access to the project root, configuration and
//! derived paths.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::layout::ProjectLayout;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Environment variable that selects the project root.
pub const ROOT_ENV: &str = "CXXPAD_ROOT";

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Project root (absolute)
    root: PathBuf,

    /// Merged global + project configuration
    config: Config,

    /// Whether to use verbose output
    verbose: bool,
}

impl GlobalContext {
    /// Create a context rooted at the current working directory, or at
    /// `$CXXPAD_ROOT` when it is set.
    pub fn new() -> Result<Self> {
        let root = match std::env::var_os(ROOT_ENV) {
            Some(root) if !root.is_empty() => PathBuf::from(root),
            _ => std::env::current_dir().context("failed to get current directory")?,
        };
        Self::with_root(root)
    }

    /// Create a context rooted at a specific directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()
                .context("failed to get current directory")?
                .join(root)
        };
        let root = crate::util::fs::normalize_path(&root);

        let config = load_config(global_config_path().as_deref(), &project_config_path(&root));

        Ok(GlobalContext {
            root,
            config,
            verbose: false,
        })
    }

    /// Replace the loaded configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Get the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the merged configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Project layout derived from the root and configuration.
    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout::new(&self.root).with_build_settings(&self.config.build)
    }
}
