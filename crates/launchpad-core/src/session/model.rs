//! Session domain model.
//!
//! A `Session` is one user-editable run configuration: the configuration
//! document plus the mode, tags and step selection that accompany it.

use crate::descriptor::PipelineDescriptor;
use serde::{Deserialize, Serialize};

/// Step selection query meaning "every step".
pub const ALL_STEPS_QUERY: &str = "*";

/// A single `key=value` execution tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionTag {
    pub key: String,
    pub value: String,
}

impl ExecutionTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Source of defaults a session was created from.
///
/// Only consulted at creation time; never re-resolved afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionBase {
    Preset {
        name: String,
    },
    PartitionSet {
        partitions_set_name: String,
        partition_name: Option<String>,
    },
}

/// One run configuration editing unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique key within its session set, stable across edits
    pub key: String,
    /// Display label shown on the session tab
    pub name: String,
    /// Run configuration document, opaque at this layer
    pub run_config_yaml: String,
    /// Selected mode; `None` means the user still has to pick one
    pub mode: Option<String>,
    /// Ordered tags; keys may repeat
    pub tags: Vec<ExecutionTag>,
    /// Selected step identifiers; `None` means all steps
    pub step_selection: Option<Vec<String>>,
    /// Query text that produced `step_selection`
    pub step_selection_query: String,
    /// Defaults source used when the session was created
    pub base: Option<SessionBase>,
    /// Whether the step graph is rendered flattened
    pub flatten_graphs: bool,
    /// Id of the last run launched from this session
    pub run_id: Option<String>,
    /// Set when the document was edited after `run_id` was launched
    pub config_changed_since_run: bool,
}

impl Session {
    /// Creates a session with the given key and name and every other field empty.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            run_config_yaml: String::new(),
            mode: None,
            tags: Vec::new(),
            step_selection: None,
            step_selection_query: ALL_STEPS_QUERY.to_string(),
            base: None,
            flatten_graphs: false,
            run_id: None,
            config_changed_since_run: false,
        }
    }

    /// Whether the selected mode is declared by `pipeline`.
    ///
    /// Stored sessions are not reconciled when a definition changes, so a
    /// stale mode name is reported here rather than repaired.
    pub fn is_mode_declared(&self, pipeline: &PipelineDescriptor) -> bool {
        match &self.mode {
            Some(mode) => pipeline.declares_mode(mode),
            None => false,
        }
    }

    pub fn selects_all_steps(&self) -> bool {
        self.step_selection.is_none()
    }
}
