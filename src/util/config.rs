//! Configuration file support for pybridge.
//!
//! pybridge supports two configuration file locations:
//! - Global: `~/.pybridge/config.toml` - User-wide defaults
//! - Project: `pybridge.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config; command line flags
//! take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::bind::handle::HandleKind;

/// Name of the project configuration file.
pub const PROJECT_CONFIG_NAME: &str = "pybridge.toml";

/// Default Python interpreter.
pub const DEFAULT_VM: &str = "python";

/// Default Python API major version.
pub const DEFAULT_API_VERSION: u32 = 3;

/// pybridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where artifacts go
    pub output: OutputConfig,

    /// Target interpreter settings
    pub python: PythonConfig,

    /// Handle representation
    pub handle: HandleConfigSection,
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory (default: current directory)
    pub dir: Option<PathBuf>,

    /// Output package name (default: first package's name)
    pub name: Option<String>,
}

/// Interpreter-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    /// Interpreter to build against (name on PATH or full path)
    pub vm: Option<String>,

    /// Python API major version (2 or 3)
    pub api_version: Option<u32>,

    /// Shared library extension, e.g. `.so`
    pub lib_ext: Option<String>,
}

/// Handle configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleConfigSection {
    /// Handle kind (int64, string)
    pub kind: Option<HandleKind>,
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
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Output settings
        if other.output.dir.is_some() {
            self.output.dir = other.output.dir;
        }
        if other.output.name.is_some() {
            self.output.name = other.output.name;
        }

        // Python settings
        if other.python.vm.is_some() {
            self.python.vm = other.python.vm;
        }
        if other.python.api_version.is_some() {
            self.python.api_version = other.python.api_version;
        }
        if other.python.lib_ext.is_some() {
            self.python.lib_ext = other.python.lib_ext;
        }

        // Handle settings
        if other.handle.kind.is_some() {
            self.handle.kind = other.handle.kind;
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn vm(&self) -> &str {
        self.python.vm.as_deref().unwrap_or(DEFAULT_VM)
    }

    pub fn api_version(&self) -> u32 {
        self.python.api_version.unwrap_or(DEFAULT_API_VERSION)
    }

    pub fn lib_ext(&self) -> &str {
        self.python.lib_ext.as_deref().unwrap_or(default_lib_ext())
    }

    pub fn handle_kind(&self) -> HandleKind {
        self.handle.kind.unwrap_or_default()
    }
}

/// Shared library extension of the host platform.
pub fn default_lib_ext() -> &'static str {
    if cfg!(target_os = "macos") {
        ".dylib"
    } else if cfg!(target_os = "windows") {
        ".dll"
    } else {
        ".so"
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (pybridge.toml)
/// 2. Global config (~/.pybridge/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global pybridge config directory (~/.pybridge).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".pybridge"))
}

/// Get the global config path (~/.pybridge/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (pybridge.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_NAME)
}
