//! Configuration service implementation.
//!
//! Loads `LaunchpadConfig` from `config.toml` (by default
//! `~/.config/launchpad/config.toml`, or the file named by `LAUNCHPAD_CONFIG`).

use crate::paths::LaunchpadPaths;
use crate::storage::AtomicTomlFile;
use launchpad_core::config::LaunchpadConfig;
use launchpad_core::error::{LaunchpadError, Result};
use std::path::{Path, PathBuf};

/// Reads the launchpad configuration file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the default location, honouring `LAUNCHPAD_CONFIG`.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: LaunchpadPaths::config_file()?,
        })
    }

    /// Uses an explicit config file, e.g. from a `--config` flag.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the configuration. A missing or empty file yields the defaults.
    pub fn load(&self) -> Result<LaunchpadConfig> {
        let file = AtomicTomlFile::<LaunchpadConfig>::new(self.path.clone());
        match file.load() {
            Ok(Some(config)) => {
                tracing::debug!("Loaded config from {:?}", self.path);
                Ok(config)
            }
            Ok(None) => {
                tracing::debug!("No config at {:?}, using defaults", self.path);
                Ok(LaunchpadConfig::default())
            }
            Err(e) => Err(LaunchpadError::config(format!(
                "Failed to load {:?}: {}",
                self.path, e
            ))),
        }
    }

    /// Resolves the sessions directory: the configured one, or the platform default.
    pub fn sessions_dir(config: &LaunchpadConfig) -> Result<PathBuf> {
        match &config.storage.directory {
            Some(directory) => Ok(directory.clone()),
            None => LaunchpadPaths::sessions_dir(),
        }
    }
}
