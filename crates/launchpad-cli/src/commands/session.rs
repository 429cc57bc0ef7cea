use anyhow::{Context, Result, bail};
use clap::Args;
use launchpad_core::session::{ALL_STEPS_QUERY, ExecutionTag, SessionChanges};
use std::fs;
use std::path::PathBuf;

/// Changes to apply to the current session.
#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    /// New session name
    #[arg(long)]
    pub name: Option<String>,

    /// Replace the run configuration with the contents of this file
    #[arg(long)]
    pub yaml_file: Option<PathBuf>,

    /// Select a mode
    #[arg(long, conflicts_with = "unset_mode")]
    pub mode: Option<String>,

    /// Clear the selected mode
    #[arg(long)]
    pub unset_mode: bool,

    /// Tag as key=value; repeat for several. Replaces every existing tag.
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Remove every tag
    #[arg(long, conflicts_with = "tags")]
    pub clear_tags: bool,

    /// Comma separated step keys to execute
    #[arg(long, value_delimiter = ',', conflicts_with = "all_steps")]
    pub steps: Option<Vec<String>>,

    /// Execute every step
    #[arg(long)]
    pub all_steps: bool,

    /// Render the step graph flattened
    #[arg(long)]
    pub flatten_graphs: Option<bool>,
}

impl EditArgs {
    pub fn to_changes(&self) -> Result<SessionChanges> {
        let mut changes = match &self.yaml_file {
            Some(path) => {
                let yaml = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {:?}", path))?;
                SessionChanges::config_edit(yaml)
            }
            None => SessionChanges::new(),
        };

        if let Some(name) = &self.name {
            changes = changes.name(name);
        }
        if let Some(mode) = &self.mode {
            changes = changes.mode(Some(mode.clone()));
        } else if self.unset_mode {
            changes = changes.mode(None);
        }
        if !self.tags.is_empty() {
            let tags = self
                .tags
                .iter()
                .map(|tag| parse_tag(tag))
                .collect::<Result<Vec<_>>>()?;
            changes = changes.tags(tags);
        } else if self.clear_tags {
            changes = changes.tags(Vec::new());
        }
        if let Some(steps) = &self.steps {
            changes = changes.step_selection(Some(steps.clone()), steps.join(","));
        } else if self.all_steps {
            changes = changes.step_selection(None, ALL_STEPS_QUERY);
        }
        if let Some(flatten) = self.flatten_graphs {
            changes = changes.flatten_graphs(flatten);
        }

        Ok(changes)
    }
}

fn parse_tag(tag: &str) -> Result<ExecutionTag> {
    match tag.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok(ExecutionTag::new(key.trim(), value)),
        _ => bail!("Invalid tag '{}', expected key=value", tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_args_make_empty_changes() {
        assert!(EditArgs::default().to_changes().unwrap().is_empty());
    }

    #[test]
    fn test_tags_and_steps() {
        let args = EditArgs {
            tags: vec!["team=data".to_string(), "team=ml".to_string(), "note=a=b".to_string()],
            steps: Some(vec!["load".to_string(), "transform".to_string()]),
            ..EditArgs::default()
        };

        let changes = args.to_changes().unwrap();
        assert_eq!(
            changes.tags,
            Some(vec![
                ExecutionTag::new("team", "data"),
                ExecutionTag::new("team", "ml"),
                ExecutionTag::new("note", "a=b"),
            ])
        );
        assert_eq!(
            changes.step_selection,
            Some(Some(vec!["load".to_string(), "transform".to_string()]))
        );
        assert_eq!(changes.step_selection_query.as_deref(), Some("load,transform"));
    }

    #[test]
    fn test_invalid_tag() {
        let args = EditArgs {
            tags: vec!["novalue".to_string()],
            ..EditArgs::default()
        };
        assert!(args.to_changes().is_err());
    }

    #[test]
    fn test_yaml_file_is_a_config_edit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("run.yaml");
        fs::write(&path, "ops:\n  load: {}\n").unwrap();

        let args = EditArgs {
            yaml_file: Some(path),
            unset_mode: true,
            ..EditArgs::default()
        };
        let changes = args.to_changes().unwrap();
        assert_eq!(changes.run_config_yaml.as_deref(), Some("ops:\n  load: {}\n"));
        assert_eq!(changes.config_changed_since_run, Some(true));
        assert_eq!(changes.mode, Some(None));
    }
}
