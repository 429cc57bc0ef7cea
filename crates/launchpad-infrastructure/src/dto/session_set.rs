//! Session set DTOs and migrations

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use launchpad_core::descriptor::SessionScope;
use launchpad_core::session::{ALL_STEPS_QUERY, ExecutionTag, Session, SessionBase};

/// Value written to `schema_version` by the current schema.
pub const SESSION_SET_SCHEMA_VERSION: &str = "1.1.0";

fn default_step_selection_query() -> String {
    ALL_STEPS_QUERY.to_string()
}

// ============================================================================
// Shared value DTOs
// ============================================================================

/// Tag row, stored as `[[sessions.tags]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagV1 {
    pub key: String,
    pub value: String,
}

impl From<&ExecutionTag> for TagV1 {
    fn from(tag: &ExecutionTag) -> Self {
        Self {
            key: tag.key.clone(),
            value: tag.value.clone(),
        }
    }
}

impl From<TagV1> for ExecutionTag {
    fn from(tag: TagV1) -> Self {
        ExecutionTag::new(tag.key, tag.value)
    }
}

/// Flat representation of `SessionBase`: a preset name, or a partition set
/// with an optional partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionBaseV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitions_set_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_name: Option<String>,
}

impl From<&SessionBase> for SessionBaseV1 {
    fn from(base: &SessionBase) -> Self {
        match base {
            SessionBase::Preset { name } => Self {
                preset_name: Some(name.clone()),
                partitions_set_name: None,
                partition_name: None,
            },
            SessionBase::PartitionSet {
                partitions_set_name,
                partition_name,
            } => Self {
                preset_name: None,
                partitions_set_name: Some(partitions_set_name.clone()),
                partition_name: partition_name.clone(),
            },
        }
    }
}

impl SessionBaseV1 {
    /// `None` when neither a preset nor a partition set is named.
    fn into_base(self) -> Option<SessionBase> {
        if let Some(name) = self.preset_name {
            return Some(SessionBase::Preset { name });
        }
        self.partitions_set_name
            .map(|partitions_set_name| SessionBase::PartitionSet {
                partitions_set_name,
                partition_name: self.partition_name,
            })
    }
}

// ============================================================================
// Session DTOs
// ============================================================================

/// V1.0.0 of a stored session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct SessionV1_0_0 {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub run_config_yaml: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagV1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_selection: Option<Vec<String>>,
    #[serde(default = "default_step_selection_query")]
    pub step_selection_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<SessionBaseV1>,
}

/// V1.1.0 of a stored session.
/// Added flatten_graphs, run_id and config_changed_since_run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct SessionV1_1_0 {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub run_config_yaml: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default)]
    pub flatten_graphs: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(default)]
    pub config_changed_since_run: bool,
    #[serde(default = "default_step_selection_query")]
    pub step_selection_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_selection: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Vec<TagV1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<SessionBaseV1>,
}

impl MigratesTo<SessionV1_1_0> for SessionV1_0_0 {
    fn migrate(self) -> SessionV1_1_0 {
        SessionV1_1_0 {
            key: self.key,
            name: self.name,
            run_config_yaml: self.run_config_yaml,
            mode: self.mode,
            flatten_graphs: false,
            run_id: None,
            config_changed_since_run: false,
            step_selection_query: self.step_selection_query,
            step_selection: self.step_selection,
            tags: self.tags,
            base: self.base,
        }
    }
}

impl IntoDomain<Session> for SessionV1_1_0 {
    fn into_domain(self) -> Session {
        Session {
            key: self.key,
            name: self.name,
            run_config_yaml: self.run_config_yaml,
            mode: self.mode,
            tags: self.tags.into_iter().map(ExecutionTag::from).collect(),
            step_selection: self.step_selection,
            step_selection_query: self.step_selection_query,
            base: self.base.and_then(SessionBaseV1::into_base),
            flatten_graphs: self.flatten_graphs,
            run_id: self.run_id,
            config_changed_since_run: self.config_changed_since_run,
        }
    }
}

impl FromDomain<Session> for SessionV1_1_0 {
    fn from_domain(session: Session) -> Self {
        SessionV1_1_0 {
            tags: session.tags.iter().map(TagV1::from).collect(),
            base: session.base.as_ref().map(SessionBaseV1::from),
            key: session.key,
            name: session.name,
            run_config_yaml: session.run_config_yaml,
            mode: session.mode,
            flatten_graphs: session.flatten_graphs,
            run_id: session.run_id,
            config_changed_since_run: session.config_changed_since_run,
            step_selection_query: session.step_selection_query,
            step_selection: session.step_selection,
        }
    }
}

// ============================================================================
// SessionSet DTOs
// ============================================================================

/// Stored scope, kept inside the file so scopes can be listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeV1 {
    pub repository_location_name: String,
    pub repository_name: String,
    pub pipeline_name: String,
}

impl From<&SessionScope> for ScopeV1 {
    fn from(scope: &SessionScope) -> Self {
        Self {
            repository_location_name: scope.repository_location_name.clone(),
            repository_name: scope.repository_name.clone(),
            pipeline_name: scope.pipeline_name.clone(),
        }
    }
}

impl From<ScopeV1> for SessionScope {
    fn from(scope: ScopeV1) -> Self {
        SessionScope::new(
            scope.repository_location_name,
            scope.repository_name,
            scope.pipeline_name,
        )
    }
}

/// V1.0.0 of a stored session set. Written without `schema_version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct SessionSetV1_0_0 {
    pub current: String,
    pub scope: ScopeV1,
    #[serde(default)]
    pub sessions: Vec<SessionV1_0_0>,
}

/// V1.1.0 of a stored session set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct SessionSetV1_1_0 {
    pub schema_version: String,
    pub current: String,
    pub scope: ScopeV1,
    #[serde(default)]
    pub sessions: Vec<SessionV1_1_0>,
}

/// Type alias for the latest session set schema.
pub type SessionSetDTO = SessionSetV1_1_0;

impl MigratesTo<SessionSetV1_1_0> for SessionSetV1_0_0 {
    fn migrate(self) -> SessionSetV1_1_0 {
        SessionSetV1_1_0 {
            schema_version: SESSION_SET_SCHEMA_VERSION.to_string(),
            current: self.current,
            scope: self.scope,
            sessions: self
                .sessions
                .into_iter()
                .map(<SessionV1_0_0 as MigratesTo<SessionV1_1_0>>::migrate)
                .collect(),
        }
    }
}

impl SessionSetV1_1_0 {
    /// Builds the DTO for `sessions` stored under `scope`.
    pub fn new(scope: &SessionScope, current: &str, sessions: &[Session]) -> Self {
        Self {
            schema_version: SESSION_SET_SCHEMA_VERSION.to_string(),
            current: current.to_string(),
            scope: ScopeV1::from(scope),
            sessions: sessions
                .iter()
                .cloned()
                .map(SessionV1_1_0::from_domain)
                .collect(),
        }
    }

    /// Splits the DTO into the domain parts a `SessionSet` is rebuilt from.
    pub fn into_parts(self) -> (SessionScope, Vec<Session>, String) {
        let sessions: Vec<Session> = self
            .sessions
            .into_iter()
            .map(IntoDomain::into_domain)
            .collect();
        (self.scope.into(), sessions, self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        let mut session = Session::new("s1", "Backfill");
        session.run_config_yaml = "ops:\n  load:\n    config: {}\n".to_string();
        session.mode = Some("prod".to_string());
        session.tags = vec![ExecutionTag::new("team", "data"), ExecutionTag::new("team", "ml")];
        session.step_selection = Some(vec!["load".to_string(), "transform".to_string()]);
        session.step_selection_query = "load+".to_string();
        session.base = Some(SessionBase::PartitionSet {
            partitions_set_name: "daily".to_string(),
            partition_name: Some("2024-01-01".to_string()),
        });
        session.run_id = Some("run-42".to_string());
        session.config_changed_since_run = true;
        session
    }

    #[test]
    fn test_session_dto_preserves_every_field() {
        let session = sample_session();
        let dto = SessionV1_1_0::from_domain(session.clone());
        let text = toml::to_string_pretty(&dto).unwrap();
        let parsed: SessionV1_1_0 = toml::from_str(&text).unwrap();
        assert_eq!(parsed.into_domain(), session);
    }

    #[test]
    fn test_preset_base_flattening() {
        let base = SessionBase::Preset {
            name: "nightly".to_string(),
        };
        let dto = SessionBaseV1::from(&base);
        assert_eq!(dto.preset_name.as_deref(), Some("nightly"));
        assert_eq!(dto.into_base(), Some(base));

        let empty = SessionBaseV1 {
            preset_name: None,
            partitions_set_name: None,
            partition_name: None,
        };
        assert_eq!(empty.into_base(), None);
    }

    #[test]
    fn test_v1_0_0_session_set_migrates() {
        let legacy = r#"
            current = "s1"

            [scope]
            repository_location_name = "loc"
            repository_name = "repo"
            pipeline_name = "etl"

            [[sessions]]
            key = "s1"
            name = "Unnamed-1"
            run_config_yaml = "foo: bar"
            mode = "default"

            [[sessions.tags]]
            key = "owner"
            value = "alice"
        "#;

        let v1: SessionSetV1_0_0 = toml::from_str(legacy).unwrap();
        let latest: SessionSetV1_1_0 = v1.migrate();
        assert_eq!(latest.schema_version, SESSION_SET_SCHEMA_VERSION);

        let (scope, sessions, current) = latest.into_parts();
        assert_eq!(scope, SessionScope::new("loc", "repo", "etl"));
        assert_eq!(current, "s1");
        assert_eq!(sessions.len(), 1);
        let session = &sessions[0];
        assert_eq!(session.step_selection_query, "*");
        assert_eq!(session.tags, vec![ExecutionTag::new("owner", "alice")]);
        assert!(!session.flatten_graphs);
        assert!(session.run_id.is_none());
    }
}
