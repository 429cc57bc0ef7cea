//! Path management for launchpad configuration and session files.
//!
//! Paths are resolved through `AppPaths` from the version-migrate crate so
//! they follow the platform conventions (XDG on Linux).
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/launchpad/          # Config directory
//! ├── config.toml               # LaunchpadConfig
//! └── sessions/                 # One TOML file per session scope
//!     ├── <scope-uuid>.toml
//!     └── <scope-uuid>.lock
//! ```

use launchpad_core::LaunchpadError;
use std::path::PathBuf;
use version_migrate::AppPaths;

const APP_NAME: &str = "launchpad";

/// Environment variable naming an alternate `config.toml`.
pub const CONFIG_ENV_VAR: &str = "LAUNCHPAD_CONFIG";

pub struct LaunchpadPaths;

impl LaunchpadPaths {
    fn app_paths() -> AppPaths {
        AppPaths::new(APP_NAME)
    }

    /// Returns the launchpad configuration directory.
    pub fn config_dir() -> Result<PathBuf, LaunchpadError> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| LaunchpadError::config("Cannot find home directory"))
    }

    /// Returns the path of `config.toml`, honouring `LAUNCHPAD_CONFIG`.
    pub fn config_file() -> Result<PathBuf, LaunchpadError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default sessions directory.
    pub fn sessions_dir() -> Result<PathBuf, LaunchpadError> {
        Ok(Self::config_dir()?.join("sessions"))
    }
}
