//! In-memory SessionSetRepository implementation.

use async_trait::async_trait;
use launchpad_core::descriptor::SessionScope;
use launchpad_core::error::Result;
use launchpad_core::session::{SessionSet, SessionSetRepository, StoredSessionSet};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keeps session sets in process memory. Nothing survives a restart.
///
/// Whole values are swapped under the write lock, so a reader sees either the
/// previous set or the new one.
#[derive(Default)]
pub struct InMemorySessionSetRepository {
    sets: RwLock<HashMap<SessionScope, SessionSet>>,
}

impl InMemorySessionSetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionSetRepository for InMemorySessionSetRepository {
    async fn find(&self, scope: &SessionScope) -> Result<Option<StoredSessionSet>> {
        Ok(self.sets.read().await.get(scope).map(StoredSessionSet::from))
    }

    async fn save(&self, scope: &SessionScope, set: &SessionSet) -> Result<()> {
        self.sets.write().await.insert(scope.clone(), set.clone());
        Ok(())
    }

    async fn delete(&self, scope: &SessionScope) -> Result<()> {
        self.sets.write().await.remove(scope);
        Ok(())
    }

    async fn list_scopes(&self) -> Result<Vec<SessionScope>> {
        let mut scopes: Vec<SessionScope> = self.sets.read().await.keys().cloned().collect();
        scopes.sort();
        Ok(scopes)
    }
}
