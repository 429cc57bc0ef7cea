//! Initial data derivation for new sessions.
//!
//! Pure function of the pipeline and partition set descriptors plus an
//! optional root default document supplied by the schema query.

use super::model::SessionBase;
use crate::descriptor::{PartitionSetsDescriptor, PipelineDescriptor};
use serde::{Deserialize, Serialize};

/// Seed values for a freshly created session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialData {
    pub run_config_yaml: String,
    /// `None` when the user has to select a mode
    pub mode: Option<String>,
    pub base: Option<SessionBase>,
}

impl InitialData {
    pub fn new(run_config_yaml: impl Into<String>, mode: Option<&str>) -> Self {
        Self {
            run_config_yaml: run_config_yaml.into(),
            mode: mode.map(str::to_string),
            base: None,
        }
    }
}

/// Derives the initial data for sessions of `pipeline`.
///
/// - `mode` is the single declared mode, or unset when zero or several exist.
/// - `run_config_yaml` is `root_default_yaml` when present and non-empty,
///   otherwise an empty document.
/// - `base` points at the only preset of a job without partition sets, or at
///   the only partition set of a non-asset pipeline.
pub fn derive_initial_data(
    pipeline: &PipelineDescriptor,
    partition_sets: &PartitionSetsDescriptor,
    root_default_yaml: Option<&str>,
) -> InitialData {
    let mode = match pipeline.modes.as_slice() {
        [only] => Some(only.name.clone()),
        _ => None,
    };

    let run_config_yaml = root_default_yaml
        .filter(|yaml| !yaml.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_default();

    InitialData {
        run_config_yaml,
        mode,
        base: derive_base(pipeline, partition_sets),
    }
}

fn derive_base(
    pipeline: &PipelineDescriptor,
    partition_sets: &PartitionSetsDescriptor,
) -> Option<SessionBase> {
    if pipeline.is_job && partition_sets.is_empty() {
        if let [preset] = pipeline.presets.as_slice() {
            return Some(SessionBase::Preset {
                name: preset.name.clone(),
            });
        }
    }

    if !pipeline.is_asset_job {
        if let [partition_set] = partition_sets.results.as_slice() {
            return Some(SessionBase::PartitionSet {
                partitions_set_name: partition_set.name.clone(),
                partition_name: None,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{PartitionSetDescriptor, PresetDescriptor};

    fn partition_sets(names: &[&str]) -> PartitionSetsDescriptor {
        PartitionSetsDescriptor {
            results: names
                .iter()
                .map(|name| PartitionSetDescriptor {
                    name: name.to_string(),
                    mode: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_single_mode_is_selected() {
        let pipeline = PipelineDescriptor::job("etl").with_modes(["prod"]);
        let data = derive_initial_data(&pipeline, &PartitionSetsDescriptor::empty(), None);
        assert_eq!(data.mode.as_deref(), Some("prod"));
    }

    #[test]
    fn test_several_modes_leave_mode_unset() {
        let pipeline = PipelineDescriptor::job("etl").with_modes(["a", "b"]);
        let data = derive_initial_data(&pipeline, &PartitionSetsDescriptor::empty(), None);
        assert_eq!(data.mode, None);
    }

    #[test]
    fn test_no_modes_leave_mode_unset() {
        let pipeline = PipelineDescriptor::job("etl");
        let data = derive_initial_data(&pipeline, &PartitionSetsDescriptor::empty(), None);
        assert_eq!(data.mode, None);
    }

    #[test]
    fn test_root_default_yaml() {
        let pipeline = PipelineDescriptor::job("etl");
        let empty = PartitionSetsDescriptor::empty();

        let data = derive_initial_data(&pipeline, &empty, Some("ops:\n  load: {}\n"));
        assert_eq!(data.run_config_yaml, "ops:\n  load: {}\n");

        let data = derive_initial_data(&pipeline, &empty, Some("   "));
        assert_eq!(data.run_config_yaml, "");

        let data = derive_initial_data(&pipeline, &empty, None);
        assert_eq!(data.run_config_yaml, "");
    }

    #[test]
    fn test_single_preset_becomes_base_for_jobs() {
        let mut pipeline = PipelineDescriptor::job("etl").with_modes(["a", "b"]);
        pipeline.presets.push(PresetDescriptor {
            name: "nightly".to_string(),
            mode: "a".to_string(),
            run_config_yaml: "resources: {}".to_string(),
        });

        let data = derive_initial_data(&pipeline, &PartitionSetsDescriptor::empty(), None);
        assert_eq!(
            data.base,
            Some(SessionBase::Preset {
                name: "nightly".to_string()
            })
        );
        // A base never changes the document or mode.
        assert_eq!(data.run_config_yaml, "");
        assert_eq!(data.mode, None);
    }

    #[test]
    fn test_single_partition_set_becomes_base() {
        let pipeline = PipelineDescriptor::job("etl");
        let data = derive_initial_data(&pipeline, &partition_sets(&["daily"]), None);
        assert_eq!(
            data.base,
            Some(SessionBase::PartitionSet {
                partitions_set_name: "daily".to_string(),
                partition_name: None,
            })
        );
    }

    #[test]
    fn test_asset_jobs_do_not_take_partition_set_base() {
        let mut pipeline = PipelineDescriptor::job("__ASSET_JOB_0");
        pipeline.is_asset_job = true;
        let data = derive_initial_data(&pipeline, &partition_sets(&["daily"]), None);
        assert_eq!(data.base, None);
    }

    #[test]
    fn test_ambiguous_partition_sets_leave_base_unset() {
        let pipeline = PipelineDescriptor::job("etl");
        let data = derive_initial_data(&pipeline, &partition_sets(&["daily", "hourly"]), None);
        assert_eq!(data.base, None);
    }
}
