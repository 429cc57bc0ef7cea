//! Unpersisted sessions for the asset launchpad.

use launchpad_core::descriptor::{PartitionSetsDescriptor, PipelineDescriptor};
use launchpad_core::session::{InitialData, Session, SessionChanges, SessionSet, derive_initial_data};

/// A single in-memory session, dropped with its owner.
///
/// Built from the caller's presets alone; the derived initial data supplies
/// only the run configuration document, which wins over any document in the
/// presets. Mode and base are whatever the presets say.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientSession {
    session: Session,
}

impl TransientSession {
    pub fn new(initial: &InitialData, presets: &SessionChanges) -> Self {
        let blank = SessionSet::seeded(&InitialData::default()).current().clone();
        let mut session = presets.apply_to(&blank);
        session.run_config_yaml = initial.run_config_yaml.clone();
        Self { session }
    }

    /// Derives the initial data from the descriptors, then builds the session.
    pub fn for_pipeline(
        pipeline: &PipelineDescriptor,
        partition_sets: &PartitionSetsDescriptor,
        root_default_yaml: Option<&str>,
        presets: &SessionChanges,
    ) -> Self {
        let initial = derive_initial_data(pipeline, partition_sets, root_default_yaml);
        Self::new(&initial, presets)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Merges `changes` into the session.
    pub fn on_save(&mut self, changes: &SessionChanges) -> &Session {
        self.session = changes.apply_to(&self.session);
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_core::session::ExecutionTag;

    #[test]
    fn test_presets_apply_but_document_comes_from_initial_data() {
        let initial = InitialData::new("ops: {}", Some("default"));
        let presets = SessionChanges::new()
            .run_config_yaml("ignored: true")
            .tags(vec![ExecutionTag::new("dagster/asset_partition", "2024-01-01")])
            .step_selection(Some(vec!["orders".to_string()]), "orders");

        let transient = TransientSession::new(&initial, &presets);
        let session = transient.session();

        assert_eq!(session.run_config_yaml, "ops: {}");
        assert_eq!(session.mode, None);
        assert_eq!(session.tags.len(), 1);
        assert_eq!(session.step_selection, Some(vec!["orders".to_string()]));
    }

    #[test]
    fn test_on_save_merges_in_memory() {
        let mut transient = TransientSession::new(&InitialData::default(), &SessionChanges::new());
        let key = transient.session().key.clone();

        transient.on_save(&SessionChanges::new().mode(Some("prod".to_string())));
        let session = transient.on_save(&SessionChanges::config_edit("foo: 1"));

        assert_eq!(session.key, key);
        assert_eq!(session.mode.as_deref(), Some("prod"));
        assert_eq!(session.run_config_yaml, "foo: 1");
    }

    #[test]
    fn test_for_pipeline_uses_root_default() {
        let mut pipeline = PipelineDescriptor::job("__ASSET_JOB_0").with_modes(["default"]);
        pipeline.is_asset_job = true;

        let transient = TransientSession::for_pipeline(
            &pipeline,
            &PartitionSetsDescriptor::empty(),
            Some("resources: {}"),
            &SessionChanges::new(),
        );

        assert_eq!(transient.session().run_config_yaml, "resources: {}");
        assert_eq!(transient.into_session().mode, None);
    }

    #[test]
    fn test_preset_mode_is_kept() {
        let initial = InitialData::new("ops: {}", Some("default"));
        let presets = SessionChanges::new().mode(Some("backfill".to_string()));

        let session = TransientSession::new(&initial, &presets).into_session();
        assert_eq!(session.mode.as_deref(), Some("backfill"));
        assert_eq!(session.base, None);
    }
}
