//! Configuration file support for cxxpad.
//!
//! cxxpad supports two configuration file locations:
//! - Global: `~/.cxxpad/config.toml` - User-wide defaults
//! - Project: `<root>/.cxxpad/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// cxxpad configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Toolchain settings
    pub toolchain: ToolchainSettings,

    /// Build settings
    pub build: BuildSettings,
}

/// Toolchain settings for C++ compilation.
///
/// Unset fields fall through to the next config file during merging; the
/// defaults apply only after every file has been merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Compiler to use instead of the detected one (path or name on PATH)
    pub compiler: Option<PathBuf>,

    /// Link the compiler's runtime libraries statically (default: true)
    pub static_runtime: Option<bool>,

    /// Extra flags appended after the dependency flags
    pub extra_flags: Option<Vec<String>>,
}

impl ToolchainSettings {
    pub fn static_runtime(&self) -> bool {
        self.static_runtime.unwrap_or(true)
    }

    pub fn extra_flags(&self) -> &[String] {
        self.extra_flags.as_deref().unwrap_or(&[])
    }
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// File name of the produced executable, without platform suffix
    pub output_name: Option<String>,

    /// File name of the dependency manifest inside the build directory
    pub manifest: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if let Some(compiler) = other.toolchain.compiler {
            self.toolchain.compiler = Some(compiler);
        }
        if let Some(static_runtime) = other.toolchain.static_runtime {
            self.toolchain.static_runtime = Some(static_runtime);
        }
        if let Some(extra_flags) = other.toolchain.extra_flags {
            self.toolchain.extra_flags = Some(extra_flags);
        }

        if let Some(output_name) = other.build.output_name {
            self.build.output_name = Some(output_name);
        }
        if let Some(manifest) = other.build.manifest {
            self.build.manifest = Some(manifest);
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (<root>/.cxxpad/config.toml)
/// 2. Global config (~/.cxxpad/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global cxxpad config directory (~/.cxxpad).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".cxxpad"))
}

/// Get the global config path (~/.cxxpad/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (<root>/.cxxpad/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".cxxpad").join("config.toml")
}
