//! Launchpad root resolution.
//!
//! Turns the query layer's answers for one pipeline into either a target the
//! launchpad can open or an error to show in its place.

use launchpad_core::descriptor::{
    LaunchpadKind, PartitionSetsDescriptor, PartitionSetsLookup, PipelineDescriptor,
    PipelineLookup,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const NO_DATA_MESSAGE: &str = "No data returned from the query layer";

/// Answers of the query layer for one pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchpadQueryResult {
    pub pipeline: PipelineLookup,
    pub partition_sets: PartitionSetsLookup,
    /// Default document of the run configuration schema, when it resolved
    #[serde(default)]
    pub root_default_yaml: Option<String>,
}

/// What the launchpad opens once both lookups succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchpadTarget {
    pub kind: LaunchpadKind,
    pub pipeline: PipelineDescriptor,
    pub partition_sets: PartitionSetsDescriptor,
    pub root_default_yaml: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchpadRootError {
    #[error("{title}: {message}")]
    NotFound { title: String, message: String },

    #[error("Python Error: {message}")]
    PythonError { message: String },
}

impl LaunchpadRootError {
    pub fn title(&self) -> &str {
        match self {
            LaunchpadRootError::NotFound { title, .. } => title,
            LaunchpadRootError::PythonError { .. } => "Python Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LaunchpadRootError::NotFound { message, .. }
            | LaunchpadRootError::PythonError { message } => message,
        }
    }
}

/// Resolves the launchpad for `pipeline_name`.
///
/// `is_job` comes from the workspace and picks the wording of not-found
/// titles; an empty `pipeline_name` means nothing was selected yet. A
/// not-found answer from either lookup wins over a Python error.
pub fn resolve_launchpad(
    kind: LaunchpadKind,
    pipeline_name: &str,
    is_job: bool,
    result: LaunchpadQueryResult,
) -> Result<LaunchpadTarget, LaunchpadRootError> {
    let (pipeline, partition_sets) = match (result.pipeline, result.partition_sets) {
        (PipelineLookup::Found(pipeline), PartitionSetsLookup::Found(partition_sets)) => {
            (pipeline, partition_sets)
        }
        (PipelineLookup::NotFound { message }, _) => {
            return Err(not_found(pipeline_name, is_job, message));
        }
        (_, PartitionSetsLookup::NotFound { .. }) => {
            return Err(not_found(pipeline_name, is_job, NO_DATA_MESSAGE.to_string()));
        }
        (PipelineLookup::PythonError { message }, _)
        | (_, PartitionSetsLookup::PythonError { message }) => {
            tracing::debug!(pipeline = %pipeline_name, "Launchpad query failed with a Python error");
            return Err(LaunchpadRootError::PythonError { message });
        }
    };

    Ok(LaunchpadTarget {
        kind,
        pipeline,
        partition_sets,
        root_default_yaml: result.root_default_yaml,
    })
}

fn not_found(pipeline_name: &str, is_job: bool, message: String) -> LaunchpadRootError {
    let title = match (pipeline_name.is_empty(), is_job) {
        (false, true) => "Job not found",
        (false, false) => "Pipeline not found",
        (true, true) => "Select a job",
        (true, false) => "Select a pipeline",
    };
    tracing::debug!(pipeline = %pipeline_name, title, "Launchpad target not found");
    LaunchpadRootError::NotFound {
        title: title.to_string(),
        message,
    }
}
