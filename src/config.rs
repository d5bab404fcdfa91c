//! Configuration loading and management
//!
//! Handles parsing of `todos.toml` configuration files.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;

/// Config file name inside the per-user config directory
pub const CONFIG_FILE: &str = "todos.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Where and how the task store is kept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding `store.json`; per-user data dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// How long to wait for the store lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: None,
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// How tasks are rendered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// chrono format string for task timestamps (local time)
    #[serde(default = "default_time_format")]
    pub time_format: String,

    /// Print image references next to image tasks
    #[serde(default = "default_true")]
    pub show_images: bool,
}

fn default_time_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time_format: default_time_format(),
            show_images: true,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "todos")
}

impl Config {
    /// Load configuration from a `todos.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, or the per-user config file if present.
    ///
    /// An explicit path must exist; the default location may be missing.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Per-user config file location
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the store directory: explicit override, then config, then
    /// the per-user data dir.
    pub fn store_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.store.dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                Error::InvalidConfig(
                    "no home directory found; set store.dir or pass --dir".to_string(),
                )
            })
    }

    fn validate(&self) -> Result<()> {
        if self.store.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "store.lock_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.display.time_format.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "display.time_format cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
