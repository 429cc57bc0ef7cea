//! Session set repository trait.
//!
//! Defines the interface for persisting session sets per scope.

use super::factory::InitialData;
use super::model::Session;
use super::set::SessionSet;
use crate::descriptor::SessionScope;
use crate::error::Result;
use async_trait::async_trait;

/// A session set as read back from storage, before any healing.
///
/// Stored data may be empty or point at a session that no longer exists;
/// [`StoredSessionSet::into_set`] restores the `SessionSet` invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSessionSet {
    pub sessions: Vec<Session>,
    pub current: String,
}

impl StoredSessionSet {
    pub fn new(sessions: Vec<Session>, current: impl Into<String>) -> Self {
        Self {
            sessions,
            current: current.into(),
        }
    }

    /// Builds the set, seeding from `seed` when nothing usable was stored.
    ///
    /// The flag is true when the result differs from what was stored, so
    /// the caller knows to write it back.
    pub fn into_set(self, seed: &InitialData) -> (SessionSet, bool) {
        let set = SessionSet::from_parts(self.sessions.clone(), self.current.clone(), seed);
        let healed = set.current_key() != self.current || set.sessions() != self.sessions.as_slice();
        (set, healed)
    }
}

impl From<&SessionSet> for StoredSessionSet {
    fn from(set: &SessionSet) -> Self {
        Self::new(set.sessions().to_vec(), set.current_key())
    }
}

/// An abstract repository for session sets, addressed by scope.
///
/// Implementations store whole `SessionSet` values: a reader must never
/// observe a partially written set.
#[async_trait]
pub trait SessionSetRepository: Send + Sync {
    /// Finds the session set stored for `scope`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(StoredSessionSet))`: Set found, not yet healed
    /// - `Ok(None)`: Nothing stored for this scope
    /// - `Err(_)`: Error occurred during retrieval
    async fn find(&self, scope: &SessionScope) -> Result<Option<StoredSessionSet>>;

    /// Replaces the stored session set for `scope`.
    async fn save(&self, scope: &SessionScope, set: &SessionSet) -> Result<()>;

    /// Removes whatever is stored for `scope` (no error if nothing was).
    async fn delete(&self, scope: &SessionScope) -> Result<()>;

    /// Lists every scope that has a stored session set.
    async fn list_scopes(&self) -> Result<Vec<SessionScope>>;
}
