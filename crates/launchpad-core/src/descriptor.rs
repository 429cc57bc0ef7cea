//! Descriptors supplied by the query layer.
//!
//! These are the shapes consumed from the collaborator that talks to the
//! orchestration API. They are assumed to be already validated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix carried by the names of implicit asset jobs.
pub const ASSET_JOB_PREFIX: &str = "__ASSET_JOB";

/// A named execution profile declared by a pipeline/job definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ModeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// A stored run configuration attached to a pipeline definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetDescriptor {
    pub name: String,
    pub mode: String,
    #[serde(default)]
    pub run_config_yaml: String,
}

/// Pipeline (or job) as described by the query layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDescriptor {
    pub name: String,
    #[serde(default)]
    pub is_job: bool,
    #[serde(default)]
    pub is_asset_job: bool,
    #[serde(default)]
    pub modes: Vec<ModeDescriptor>,
    #[serde(default)]
    pub presets: Vec<PresetDescriptor>,
}

impl PipelineDescriptor {
    /// Creates a job descriptor with no modes or presets.
    pub fn job(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_job: true,
            is_asset_job: false,
            modes: Vec::new(),
            presets: Vec::new(),
        }
    }

    pub fn with_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modes = modes.into_iter().map(ModeDescriptor::new).collect();
        self
    }

    pub fn declares_mode(&self, mode: &str) -> bool {
        self.modes.iter().any(|m| m.name == mode)
    }
}

/// A partition set attached to a pipeline; only used to seed defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionSetDescriptor {
    pub name: String,
    #[serde(default)]
    pub mode: Option<String>,
}

/// The partition sets of a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionSetsDescriptor {
    #[serde(default)]
    pub results: Vec<PartitionSetDescriptor>,
}

impl PartitionSetsDescriptor {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Outcome of looking up a pipeline through the query layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PipelineLookup {
    Found(PipelineDescriptor),
    NotFound { message: String },
    PythonError { message: String },
}

/// Outcome of looking up the partition sets of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PartitionSetsLookup {
    Found(PartitionSetsDescriptor),
    NotFound { message: String },
    PythonError { message: String },
}

/// The two presentation variants sharing the session model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchpadKind {
    Asset,
    Job,
}

impl LaunchpadKind {
    /// Classifies a pipeline path; implicit asset jobs open the asset launchpad.
    pub fn from_pipeline_path(pipeline_path: &str) -> Self {
        if pipeline_path.contains(ASSET_JOB_PREFIX) {
            LaunchpadKind::Asset
        } else {
            LaunchpadKind::Job
        }
    }

    /// Whether sessions for this kind are persisted per scope.
    pub fn uses_stored_sessions(&self) -> bool {
        matches!(self, LaunchpadKind::Job)
    }
}

impl fmt::Display for LaunchpadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchpadKind::Asset => write!(f, "asset"),
            LaunchpadKind::Job => write!(f, "job"),
        }
    }
}

/// Address of a session set: one (repository, pipeline) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionScope {
    pub repository_location_name: String,
    pub repository_name: String,
    pub pipeline_name: String,
}

impl SessionScope {
    pub fn new(
        repository_location_name: impl Into<String>,
        repository_name: impl Into<String>,
        pipeline_name: impl Into<String>,
    ) -> Self {
        Self {
            repository_location_name: repository_location_name.into(),
            repository_name: repository_name.into(),
            pipeline_name: pipeline_name.into(),
        }
    }

    /// Stable key for storage. Each name is prefixed with its length in
    /// bytes, so no two scopes share a key whatever characters they contain.
    pub fn storage_key(&self) -> String {
        [
            &self.repository_name,
            &self.repository_location_name,
            &self.pipeline_name,
        ]
        .iter()
        .map(|part| format!("{}:{}", part.len(), part))
        .collect()
    }
}

/// `<repository>@<location>:<pipeline>`, for messages only: names containing
/// `@` or `:` can render alike.
impl fmt::Display for SessionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}",
            self.repository_name, self.repository_location_name, self.pipeline_name
        )
    }
}
