#[cfg(test)]
mod tests {
    use crate::session::controller::{LaunchpadSessionController, ScopeState};
    use crate::session::store::SessionStore;
    use launchpad_core::descriptor::{
        PartitionSetDescriptor, PartitionSetsDescriptor, PipelineDescriptor, SessionScope,
    };
    use launchpad_core::error::{LaunchpadError, Result};
    use launchpad_core::session::{
        ExecutionTag, InitialData, SessionBase, SessionChanges, SessionSet, SessionSetRepository,
        StoredSessionSet,
    };
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // Mock SessionSetRepository for testing
    struct MockSessionSetRepository {
        sets: Mutex<HashMap<SessionScope, SessionSet>>,
        saves: AtomicUsize,
        fail_saves: AtomicBool,
    }

    impl MockSessionSetRepository {
        fn new() -> Self {
            Self {
                sets: Mutex::new(HashMap::new()),
                saves: AtomicUsize::new(0),
                fail_saves: AtomicBool::new(false),
            }
        }

        fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        fn stored(&self, scope: &SessionScope) -> Option<SessionSet> {
            self.sets.lock().unwrap().get(scope).cloned()
        }
    }

    #[async_trait::async_trait]
    impl SessionSetRepository for MockSessionSetRepository {
        async fn find(&self, scope: &SessionScope) -> Result<Option<StoredSessionSet>> {
            Ok(self.sets.lock().unwrap().get(scope).map(StoredSessionSet::from))
        }

        async fn save(&self, scope: &SessionScope, set: &SessionSet) -> Result<()> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(LaunchpadError::io("disk full"));
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.sets
                .lock()
                .unwrap()
                .insert(scope.clone(), set.clone());
            Ok(())
        }

        async fn delete(&self, scope: &SessionScope) -> Result<()> {
            self.sets.lock().unwrap().remove(scope);
            Ok(())
        }

        async fn list_scopes(&self) -> Result<Vec<SessionScope>> {
            Ok(self.sets.lock().unwrap().keys().cloned().collect())
        }
    }

    fn scope() -> SessionScope {
        SessionScope::new("local", "etl_repo", "daily_etl")
    }

    fn pipeline() -> PipelineDescriptor {
        PipelineDescriptor::job("daily_etl").with_modes(["default"])
    }

    fn setup() -> (Arc<MockSessionSetRepository>, LaunchpadSessionController) {
        let repository = Arc::new(MockSessionSetRepository::new());
        let controller = LaunchpadSessionController::new(SessionStore::new(repository.clone()));
        (repository, controller)
    }

    async fn enter(controller: &LaunchpadSessionController) {
        controller
            .enter(
                &scope(),
                &pipeline(),
                &PartitionSetsDescriptor::empty(),
                Some("foo: bar"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_enter_seeds_scope() {
        let (repository, controller) = setup();
        assert_eq!(controller.state(&scope()).await, ScopeState::Loading);
        assert!(controller.current(&scope()).await.is_none());

        enter(&controller).await;

        assert_eq!(controller.state(&scope()).await, ScopeState::Ready);
        let current = controller.current(&scope()).await.unwrap();
        assert_eq!(current.name, "Unnamed-1");
        assert_eq!(current.run_config_yaml, "foo: bar");
        assert_eq!(current.mode.as_deref(), Some("default"));

        let stored = repository.stored(&scope()).unwrap();
        assert_eq!(stored.current_key(), current.key);
        assert_eq!(repository.saves(), 1);
    }

    #[tokio::test]
    async fn test_reenter_keeps_ready_set() {
        let (repository, controller) = setup();
        enter(&controller).await;
        let created = controller.on_create(&scope()).await.unwrap();

        let current = controller
            .enter(
                &scope(),
                &pipeline(),
                &PartitionSetsDescriptor::empty(),
                Some("other: doc"),
            )
            .await
            .unwrap();

        assert_eq!(current, created);
        assert_eq!(controller.session_set(&scope()).await.unwrap().len(), 2);
        assert_eq!(repository.saves(), 2);
    }

    #[tokio::test]
    async fn test_enter_resumes_stored_set() {
        let (repository, controller) = setup();
        let stored = SessionSet::seeded(&InitialData::new("stored: true", None))
            .create_session(&InitialData::new("second: true", None));
        repository.save(&scope(), &stored).await.unwrap();

        enter(&controller).await;

        let current = controller.current(&scope()).await.unwrap();
        assert_eq!(current.run_config_yaml, "second: true");
        assert_eq!(controller.session_set(&scope()).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_operations_before_enter_fail() {
        let (_, controller) = setup();
        let err = controller.on_create(&scope()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_on_save_merges_into_current() {
        let (repository, controller) = setup();
        enter(&controller).await;

        let changes = SessionChanges::config_edit("foo: baz")
            .tags(vec![ExecutionTag::new("owner", "alice")]);
        let current = controller.on_save(&scope(), &changes).await.unwrap();

        assert_eq!(current.run_config_yaml, "foo: baz");
        assert!(current.config_changed_since_run);
        assert_eq!(current.tags, vec![ExecutionTag::new("owner", "alice")]);
        assert_eq!(current.mode.as_deref(), Some("default"));
        assert_eq!(repository.stored(&scope()).unwrap().current(), &current);
    }

    #[tokio::test]
    async fn test_create_uses_root_default_and_delete_falls_back() {
        let (_, controller) = setup();
        enter(&controller).await;
        let first = controller.current(&scope()).await.unwrap();

        let second = controller.on_create(&scope()).await.unwrap();
        assert_eq!(second.name, "Unnamed-2");
        assert_eq!(second.run_config_yaml, "foo: bar");

        // Deleting the current (last) tab selects the previous one.
        let current = controller.on_delete(&scope(), &second.key).await.unwrap();
        assert_eq!(current.key, first.key);

        // Deleting the only session re-seeds without the root default document.
        let reseeded = controller.on_delete(&scope(), &first.key).await.unwrap();
        assert_ne!(reseeded.key, first.key);
        assert_eq!(reseeded.run_config_yaml, "");
        assert_eq!(reseeded.mode.as_deref(), Some("default"));
        assert_eq!(controller.session_set(&scope()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_current_and_rename() {
        let (_, controller) = setup();
        enter(&controller).await;
        let first = controller.current(&scope()).await.unwrap();
        controller.on_create(&scope()).await.unwrap();

        let current = controller.on_set_current(&scope(), &first.key).await.unwrap();
        assert_eq!(current.key, first.key);

        let unchanged = controller.on_set_current(&scope(), "missing").await.unwrap();
        assert_eq!(unchanged.key, first.key);

        let renamed = controller
            .on_rename(&scope(), &first.key, "Backfill")
            .await
            .unwrap();
        assert_eq!(renamed.name, "Backfill");
    }

    #[tokio::test]
    async fn test_unchanged_set_is_not_written() {
        let (repository, controller) = setup();
        enter(&controller).await;
        let saves = repository.saves();

        controller.on_delete(&scope(), "missing").await.unwrap();
        controller.on_save(&scope(), &SessionChanges::new()).await.unwrap();

        assert_eq!(repository.saves(), saves);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_set() {
        let (repository, controller) = setup();
        enter(&controller).await;
        let before = controller.session_set(&scope()).await.unwrap();

        repository.fail_saves.store(true, Ordering::SeqCst);
        let err = controller.on_create(&scope()).await.unwrap_err();
        assert!(err.is_io());

        assert_eq!(controller.session_set(&scope()).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_partition_set_base_is_seeded() {
        let (_, controller) = setup();
        let partition_sets = PartitionSetsDescriptor {
            results: vec![PartitionSetDescriptor {
                name: "daily_partitions".to_string(),
                mode: None,
            }],
        };

        let current = controller
            .enter(&scope(), &pipeline(), &partition_sets, None)
            .await
            .unwrap();

        assert_eq!(
            current.base,
            Some(SessionBase::PartitionSet {
                partitions_set_name: "daily_partitions".to_string(),
                partition_name: None,
            })
        );
    }

    #[tokio::test]
    async fn test_scopes_are_independent() {
        let (_, controller) = setup();
        enter(&controller).await;
        let other = SessionScope::new("local", "etl_repo", "hourly_etl");
        controller
            .enter(
                &other,
                &PipelineDescriptor::job("hourly_etl"),
                &PartitionSetsDescriptor::empty(),
                None,
            )
            .await
            .unwrap();

        controller.on_create(&scope()).await.unwrap();

        assert_eq!(controller.session_set(&scope()).await.unwrap().len(), 2);
        assert_eq!(controller.session_set(&other).await.unwrap().len(), 1);
        assert_eq!(controller.current(&other).await.unwrap().mode, None);
    }
}
