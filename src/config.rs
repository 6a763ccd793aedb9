// CLI configuration

use crate::storage::{Backend, StorageProvider, open_provider};
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for the CLI: which storage backend to use and where its data
/// lives.
///
/// Loaded from a small YAML file. Fields may be omitted individually; a
/// missing file at the default location simply means defaults (file backend
/// under the platform data directory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            path: default_data_dir(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit `path` the file must exist and parse. Without one,
    /// the platform-default location is tried and a missing file yields
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_config_path(), false),
        };

        if !path.exists() {
            if required {
                return Err(eyre!("Config file not found: {}", path.display()));
            }
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), backend = ?config.backend, "loaded config");
        Ok(config)
    }

    /// Open the storage provider this configuration selects
    pub fn provider(&self) -> Result<Box<dyn StorageProvider>> {
        open_provider(self.backend, &self.path)
    }
}

/// Default data directory: `<platform data dir>/projstore`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("projstore")
}

/// Default config file: `<platform config dir>/projstore/config.yaml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("projstore")
        .join("config.yaml")
}
