use anyhow::{Context, Result};
use clap::Args;
use launchpad_application::{LaunchpadQueryResult, LaunchpadTarget, resolve_launchpad};
use launchpad_core::descriptor::{
    LaunchpadKind, PartitionSetsDescriptor, PartitionSetsLookup, PipelineDescriptor,
    PipelineLookup, SessionScope,
};
use std::fs;
use std::path::PathBuf;

/// Selects the (repository, pipeline) scope a command works on.
#[derive(Args, Debug, Clone)]
pub struct ScopeArgs {
    /// Repository location name
    #[arg(long, default_value = "local")]
    pub location: String,

    /// Repository name
    #[arg(long)]
    pub repository: String,

    /// Pipeline or job name
    #[arg(long)]
    pub pipeline: String,

    /// JSON file with the query layer's answers (pipeline, partitionSets, rootDefaultYaml)
    #[arg(long)]
    pub descriptor: Option<PathBuf>,
}

impl ScopeArgs {
    pub fn scope(&self) -> SessionScope {
        SessionScope::new(&self.location, &self.repository, &self.pipeline)
    }

    /// Reads the descriptor file, or describes a bare job when none is given.
    fn query_result(&self) -> Result<LaunchpadQueryResult> {
        let Some(path) = &self.descriptor else {
            return Ok(LaunchpadQueryResult {
                pipeline: PipelineLookup::Found(PipelineDescriptor::job(&self.pipeline)),
                partition_sets: PartitionSetsLookup::Found(PartitionSetsDescriptor::empty()),
                root_default_yaml: None,
            });
        };

        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {:?} as a launchpad descriptor", path))
    }

    /// Resolves what the launchpad opens for this scope.
    pub fn resolve(&self) -> Result<LaunchpadTarget> {
        let result = self.query_result()?;
        let is_job = match &result.pipeline {
            PipelineLookup::Found(pipeline) => pipeline.is_job,
            _ => true,
        };
        let kind = LaunchpadKind::from_pipeline_path(&self.pipeline);
        Ok(resolve_launchpad(kind, &self.pipeline, is_job, result)?)
    }
}
