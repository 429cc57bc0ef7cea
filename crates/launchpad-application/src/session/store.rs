//! Persistent session sets, one per scope.

use launchpad_core::config::{LaunchpadConfig, StorageBackend};
use launchpad_core::descriptor::SessionScope;
use launchpad_core::error::Result;
use launchpad_core::session::{InitialData, SessionSet, SessionSetRepository};
use launchpad_infrastructure::{ConfigService, InMemorySessionSetRepository, TomlSessionSetRepository};
use std::sync::Arc;

/// Loads and saves session sets through a [`SessionSetRepository`].
///
/// The store owns the persisted representation. Set transitions themselves
/// are pure (`create_session`, `delete_session`); callers persist the result
/// with [`SessionStore::save`].
#[derive(Clone)]
pub struct SessionStore {
    repository: Arc<dyn SessionSetRepository>,
}

impl SessionStore {
    pub fn new(repository: Arc<dyn SessionSetRepository>) -> Self {
        Self { repository }
    }

    /// Builds a store over the backend selected by `config`.
    pub fn from_config(config: &LaunchpadConfig) -> Result<Self> {
        let repository: Arc<dyn SessionSetRepository> = match config.storage.backend {
            StorageBackend::Toml => {
                let directory = ConfigService::sessions_dir(config)?;
                tracing::debug!("Using TOML session storage at {:?}", directory);
                Arc::new(TomlSessionSetRepository::new(directory)?)
            }
            StorageBackend::Memory => {
                tracing::debug!("Using in-memory session storage");
                Arc::new(InMemorySessionSetRepository::new())
            }
        };
        Ok(Self::new(repository))
    }

    /// Returns the stored set for `scope`, or seeds, persists and returns a
    /// new one holding a single session built from `initial`.
    ///
    /// A stored set that breaks the set invariants is healed with `initial`
    /// as the seed and written back.
    pub async fn load(&self, scope: &SessionScope, initial: &InitialData) -> Result<SessionSet> {
        if let Some(stored) = self.repository.find(scope).await? {
            let (set, healed) = stored.into_set(initial);
            if healed {
                self.repository.save(scope, &set).await?;
                tracing::info!(scope = %scope, current = %set.current_key(), "Healed stored session set");
            } else {
                tracing::debug!(scope = %scope, sessions = set.len(), "Loaded session set");
            }
            return Ok(set);
        }

        let set = SessionSet::seeded(initial);
        self.repository.save(scope, &set).await?;
        tracing::info!(scope = %scope, current = %set.current_key(), "Created session set");
        Ok(set)
    }

    /// Replaces the stored set for `scope`.
    pub async fn save(&self, scope: &SessionScope, set: &SessionSet) -> Result<()> {
        self.repository.save(scope, set).await
    }

    /// Appends a session seeded from `initial` and makes it current.
    pub fn create_session(set: SessionSet, initial: &InitialData) -> SessionSet {
        set.create_session(initial)
    }

    /// Removes `key`; deleting the last session re-seeds from `fallback`.
    pub fn delete_session(set: SessionSet, key: &str, fallback: &InitialData) -> SessionSet {
        set.delete_session(key, fallback)
    }

    /// Scopes with a stored set.
    pub async fn list_scopes(&self) -> Result<Vec<SessionScope>> {
        self.repository.list_scopes().await
    }

    /// Forgets everything stored for `scope`; the next `load` re-seeds it.
    pub async fn clear(&self, scope: &SessionScope) -> Result<()> {
        self.repository.delete(scope).await?;
        tracing::info!(scope = %scope, "Cleared session set");
        Ok(())
    }
}
