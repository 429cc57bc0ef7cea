//! Partial change-sets applied to a session.

use super::model::{ExecutionTag, Session, SessionBase};
use serde::{Deserialize, Serialize};

/// A partial update over the editable fields of a [`Session`].
///
/// Absent fields leave the session untouched. Sequence fields (`tags`,
/// `step_selection`) replace the previous value wholesale. Optional fields
/// use a nested `Option`: `Some(None)` clears the value.
///
/// There is no `key` field: the key of a session never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_config_yaml: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<ExecutionTag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_selection: Option<Option<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_selection_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Option<SessionBase>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flatten_graphs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_changed_since_run: Option<bool>,
}

impl SessionChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn run_config_yaml(mut self, yaml: impl Into<String>) -> Self {
        self.run_config_yaml = Some(yaml.into());
        self
    }

    /// A document edit made in the editor; also marks the session as diverged
    /// from its last launched run.
    pub fn config_edit(yaml: impl Into<String>) -> Self {
        Self::new()
            .run_config_yaml(yaml)
            .config_changed_since_run(true)
    }

    pub fn mode(mut self, mode: Option<String>) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn tags(mut self, tags: Vec<ExecutionTag>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn step_selection(mut self, selection: Option<Vec<String>>, query: impl Into<String>) -> Self {
        self.step_selection = Some(selection);
        self.step_selection_query = Some(query.into());
        self
    }

    pub fn base(mut self, base: Option<SessionBase>) -> Self {
        self.base = Some(base);
        self
    }

    pub fn flatten_graphs(mut self, flatten: bool) -> Self {
        self.flatten_graphs = Some(flatten);
        self
    }

    pub fn run_id(mut self, run_id: Option<String>) -> Self {
        self.run_id = Some(run_id);
        self
    }

    pub fn config_changed_since_run(mut self, changed: bool) -> Self {
        self.config_changed_since_run = Some(changed);
        self
    }

    /// Returns `session` with these changes applied (shallow merge).
    pub fn apply_to(&self, session: &Session) -> Session {
        let mut next = session.clone();

        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(yaml) = &self.run_config_yaml {
            next.run_config_yaml = yaml.clone();
        }
        if let Some(mode) = &self.mode {
            next.mode = mode.clone();
        }
        if let Some(tags) = &self.tags {
            next.tags = tags.clone();
        }
        if let Some(selection) = &self.step_selection {
            next.step_selection = selection.clone();
        }
        if let Some(query) = &self.step_selection_query {
            next.step_selection_query = query.clone();
        }
        if let Some(base) = &self.base {
            next.base = base.clone();
        }
        if let Some(flatten) = self.flatten_graphs {
            next.flatten_graphs = flatten;
        }
        if let Some(run_id) = &self.run_id {
            next.run_id = run_id.clone();
        }
        if let Some(changed) = self.config_changed_since_run {
            next.config_changed_since_run = changed;
        }

        next
    }
}

/// Applies `changes` to `session`, returning the updated value.
pub fn apply_changes(session: &Session, changes: &SessionChanges) -> Session {
    changes.apply_to(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        let mut session = Session::new("s-abc", "Unnamed-1");
        session.run_config_yaml = "foo: bar".to_string();
        session.mode = Some("prod".to_string());
        session.tags = vec![ExecutionTag::new("team", "data"), ExecutionTag::new("team", "infra")];
        session.step_selection = Some(vec!["load".to_string()]);
        session
    }

    #[test]
    fn test_empty_changes_are_identity() {
        let session = sample_session();
        let changes = SessionChanges::new();
        assert!(changes.is_empty());
        assert_eq!(apply_changes(&session, &changes), session);
    }

    #[test]
    fn test_tags_replace_wholesale() {
        let session = sample_session();
        let tags = vec![ExecutionTag::new("owner", "alice")];
        let updated = apply_changes(&session, &SessionChanges::new().tags(tags.clone()));
        assert_eq!(updated.tags, tags);

        let cleared = apply_changes(&session, &SessionChanges::new().tags(Vec::new()));
        assert!(cleared.tags.is_empty());
    }

    #[test]
    fn test_step_selection_replaces_and_can_reset_to_all() {
        let session = sample_session();
        let updated = apply_changes(
            &session,
            &SessionChanges::new().step_selection(Some(vec!["transform".to_string()]), "transform"),
        );
        assert_eq!(updated.step_selection, Some(vec!["transform".to_string()]));
        assert_eq!(updated.step_selection_query, "transform");

        let all = apply_changes(&session, &SessionChanges::new().step_selection(None, "*"));
        assert!(all.selects_all_steps());
    }

    #[test]
    fn test_unspecified_fields_untouched() {
        let session = sample_session();
        let updated = apply_changes(&session, &SessionChanges::new().name("Backfill"));
        assert_eq!(updated.name, "Backfill");
        assert_eq!(updated.key, session.key);
        assert_eq!(updated.run_config_yaml, session.run_config_yaml);
        assert_eq!(updated.mode, session.mode);
        assert_eq!(updated.tags, session.tags);
    }

    #[test]
    fn test_mode_can_be_unset() {
        let session = sample_session();
        let updated = apply_changes(&session, &SessionChanges::new().mode(None));
        assert_eq!(updated.mode, None);
    }

    #[test]
    fn test_config_edit_marks_divergence() {
        let mut session = sample_session();
        session.run_id = Some("run-1".to_string());
        let updated = apply_changes(&session, &SessionChanges::config_edit("foo: baz"));
        assert_eq!(updated.run_config_yaml, "foo: baz");
        assert!(updated.config_changed_since_run);
        assert_eq!(updated.run_id.as_deref(), Some("run-1"));
    }

    #[test]
    fn test_key_in_json_payload_is_ignored() {
        let changes: SessionChanges =
            serde_json::from_str(r#"{"key": "hijack", "name": "Renamed"}"#).unwrap();
        let updated = apply_changes(&sample_session(), &changes);
        assert_eq!(updated.key, "s-abc");
        assert_eq!(updated.name, "Renamed");
    }
}
