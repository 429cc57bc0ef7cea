//! Error types for the launchpad crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by persistence and configuration.
///
/// Session operations never produce errors (unknown keys are clamped or
/// ignored, an empty set is healed).
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum LaunchpadError {
    /// A scope or other addressed entity is unknown
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    #[error("I/O failure: {message}")]
    Io { message: String },

    /// The storage backend could not serve the request
    #[error("Storage error: {0}")]
    DataAccess(String),

    #[error("Cannot encode or decode {format}: {message}")]
    Serialization { format: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A stored session set uses a schema this build cannot read
    #[error("Cannot migrate stored sessions: {0}")]
    Migration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LaunchpadError {
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    fn serialization(format: &str, err: impl std::fmt::Display) -> Self {
        Self::Serialization {
            format: format.to_string(),
            message: err.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<std::io::Error> for LaunchpadError {
    fn from(err: std::io::Error) -> Self {
        Self::io(format!("{:?}: {}", err.kind(), err))
    }
}

impl From<serde_json::Error> for LaunchpadError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("JSON", err)
    }
}

impl From<toml::de::Error> for LaunchpadError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization("TOML", err)
    }
}

impl From<toml::ser::Error> for LaunchpadError {
    fn from(err: toml::ser::Error) -> Self {
        Self::serialization("TOML", err)
    }
}

pub type Result<T> = std::result::Result<T, LaunchpadError>;
