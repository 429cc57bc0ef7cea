//! Session selection for the job launchpad.

use super::store::SessionStore;
use launchpad_core::descriptor::{PartitionSetsDescriptor, PipelineDescriptor, SessionScope};
use launchpad_core::error::{LaunchpadError, Result};
use launchpad_core::session::{InitialData, Session, SessionChanges, SessionSet, derive_initial_data};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Lifecycle of a scope inside the controller.
///
/// A scope is `Loading` until its first successful [`LaunchpadSessionController::enter`]
/// and `Ready` from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeState {
    Loading,
    Ready,
}

struct ReadyScope {
    set: SessionSet,
    /// Seed for sessions created by the user
    initial: InitialData,
    /// Seed used when the last session is deleted (no root default document)
    fallback: InitialData,
}

/// Tracks the session set and current session of every entered scope.
///
/// Each operation is serialized on a single lock and persisted before the
/// in-memory state moves on, so a failed save leaves the previous set in
/// place. Operations that do not change the set are not written.
pub struct LaunchpadSessionController {
    store: SessionStore,
    scopes: Mutex<HashMap<SessionScope, ReadyScope>>,
}

impl LaunchpadSessionController {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            scopes: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Enters `scope`, loading (or seeding) its session set on first entry.
    ///
    /// Re-entering a ready scope keeps its set and only refreshes the seeds
    /// derived from the descriptors.
    pub async fn enter(
        &self,
        scope: &SessionScope,
        pipeline: &PipelineDescriptor,
        partition_sets: &PartitionSetsDescriptor,
        root_default_yaml: Option<&str>,
    ) -> Result<Session> {
        let initial = derive_initial_data(pipeline, partition_sets, root_default_yaml);
        let fallback = derive_initial_data(pipeline, partition_sets, None);

        let mut scopes = self.scopes.lock().await;
        if let Some(ready) = scopes.get_mut(scope) {
            ready.initial = initial;
            ready.fallback = fallback;
            return Ok(ready.set.current().clone());
        }

        let set = self.store.load(scope, &initial).await?;
        let current = set.current().clone();
        if current.mode.is_some() && !current.is_mode_declared(pipeline) {
            tracing::debug!(
                scope = %scope,
                mode = ?current.mode,
                "Current session selects a mode the pipeline does not declare"
            );
        }

        scopes.insert(
            scope.clone(),
            ReadyScope {
                set,
                initial,
                fallback,
            },
        );
        tracing::debug!(scope = %scope, current = %current.key, "Scope ready");
        Ok(current)
    }

    pub async fn state(&self, scope: &SessionScope) -> ScopeState {
        if self.scopes.lock().await.contains_key(scope) {
            ScopeState::Ready
        } else {
            ScopeState::Loading
        }
    }

    /// The current session, `None` while the scope is loading.
    pub async fn current(&self, scope: &SessionScope) -> Option<Session> {
        let scopes = self.scopes.lock().await;
        scopes.get(scope).map(|ready| ready.set.current().clone())
    }

    pub async fn session_set(&self, scope: &SessionScope) -> Option<SessionSet> {
        let scopes = self.scopes.lock().await;
        scopes.get(scope).map(|ready| ready.set.clone())
    }

    /// Applies `changes` to the current session.
    pub async fn on_save(&self, scope: &SessionScope, changes: &SessionChanges) -> Result<Session> {
        self.transition(scope, "save", |set, _| set.apply_changes_to_current(changes))
            .await
    }

    /// Creates a session seeded from the scope's initial data and selects it.
    pub async fn on_create(&self, scope: &SessionScope) -> Result<Session> {
        self.transition(scope, "create", |set, ready| {
            SessionStore::create_session(set, &ready.initial)
        })
        .await
    }

    /// Deletes the session with `key`. Unknown keys are ignored.
    pub async fn on_delete(&self, scope: &SessionScope, key: &str) -> Result<Session> {
        self.transition(scope, "delete", |set, ready| {
            SessionStore::delete_session(set, key, &ready.fallback)
        })
        .await
    }

    /// Selects the session with `key`. Unknown keys keep the current selection.
    pub async fn on_set_current(&self, scope: &SessionScope, key: &str) -> Result<Session> {
        self.transition(scope, "set_current", |set, _| set.set_current(key))
            .await
    }

    pub async fn on_rename(&self, scope: &SessionScope, key: &str, name: &str) -> Result<Session> {
        self.transition(scope, "rename", |set, _| set.rename_session(key, name))
            .await
    }

    /// Computes the next set, persists it when it changed, then commits it.
    async fn transition<F>(&self, scope: &SessionScope, action: &str, f: F) -> Result<Session>
    where
        F: FnOnce(SessionSet, &ReadyScope) -> SessionSet,
    {
        let mut scopes = self.scopes.lock().await;
        let ready = scopes
            .get_mut(scope)
            .ok_or_else(|| LaunchpadError::not_found("SessionScope", scope.to_string()))?;

        let next = f(ready.set.clone(), ready);
        if next == ready.set {
            tracing::debug!(scope = %scope, action, "Session set unchanged");
        } else {
            self.store.save(scope, &next).await?;
            tracing::debug!(
                scope = %scope,
                action,
                current = %next.current_key(),
                sessions = next.len(),
                "Session set updated"
            );
            ready.set = next;
        }

        Ok(ready.set.current().clone())
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
