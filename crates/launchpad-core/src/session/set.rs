//! The collection of sessions for one scope.

use super::changes::SessionChanges;
use super::factory::InitialData;
use super::model::Session;
use serde::Serialize;
use uuid::Uuid;

const UNNAMED_PREFIX: &str = "Unnamed";

/// Sessions of one (repository, pipeline) scope plus the current selection.
///
/// Invariants, upheld by every operation:
/// - `sessions` is never empty
/// - keys are unique
/// - `current` is the key of one of the sessions
///
/// Sessions are kept in tab order (creation order). Operations consume the
/// set and return the next value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSet {
    sessions: Vec<Session>,
    current: String,
}

impl SessionSet {
    /// Creates a set holding a single session seeded from `initial`.
    pub fn seeded(initial: &InitialData) -> Self {
        let session = seed_session(generate_key(&[]), default_name(0), initial);
        Self {
            current: session.key.clone(),
            sessions: vec![session],
        }
    }

    /// Rebuilds a set from stored parts, healing anything that breaks the
    /// invariants: duplicate keys are dropped (first wins), an empty list is
    /// re-seeded from `fallback`, and a dangling `current` is clamped to the
    /// first session.
    pub fn from_parts(sessions: Vec<Session>, current: String, fallback: &InitialData) -> Self {
        let mut unique: Vec<Session> = Vec::with_capacity(sessions.len());
        for session in sessions {
            if unique.iter().any(|s| s.key == session.key) {
                tracing::warn!(key = %session.key, "Dropping session with duplicate key");
                continue;
            }
            unique.push(session);
        }

        if unique.is_empty() {
            tracing::warn!("Stored session set was empty, seeding a default session");
            return Self::seeded(fallback);
        }

        let current = if unique.iter().any(|s| s.key == current) {
            current
        } else {
            tracing::warn!(current = %current, "Stored current key is unknown, clamping");
            unique[0].key.clone()
        };

        Self {
            sessions: unique,
            current,
        }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sessions.iter().map(|s| s.key.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sessions.iter().any(|s| s.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.key == key)
    }

    pub fn current_key(&self) -> &str {
        &self.current
    }

    /// The session being edited.
    pub fn current(&self) -> &Session {
        // Both lookups are backed by the non-empty invariant.
        self.get(&self.current).unwrap_or(&self.sessions[0])
    }

    /// Appends a new session seeded from `initial` and makes it current.
    pub fn create_session(mut self, initial: &InitialData) -> Self {
        let key = generate_key(&self.sessions);
        let session = seed_session(key, default_name(self.sessions.len()), initial);
        tracing::debug!(key = %session.key, name = %session.name, "Created session");
        self.current = session.key.clone();
        self.sessions.push(session);
        self
    }

    /// Removes the session with `key`.
    ///
    /// Unknown keys are ignored. When the current session is removed the
    /// previous tab becomes current (the next one if it was first). Removing
    /// the last session seeds a fresh one from `fallback`.
    pub fn delete_session(mut self, key: &str, fallback: &InitialData) -> Self {
        let Some(index) = self.sessions.iter().position(|s| s.key == key) else {
            tracing::debug!(key = %key, "Ignoring delete of unknown session");
            return self;
        };

        self.sessions.remove(index);
        tracing::debug!(key = %key, remaining = self.sessions.len(), "Deleted session");

        if self.sessions.is_empty() {
            tracing::warn!("Deleted the last session, seeding a default session");
            return Self::seeded(fallback);
        }

        if self.current == key {
            let neighbour = index.saturating_sub(1).min(self.sessions.len() - 1);
            self.current = self.sessions[neighbour].key.clone();
        }
        self
    }

    /// Makes `key` current. Unknown keys leave the selection unchanged.
    pub fn set_current(mut self, key: &str) -> Self {
        if self.contains(key) {
            self.current = key.to_string();
        } else {
            tracing::debug!(key = %key, current = %self.current, "Ignoring switch to unknown session");
        }
        self
    }

    /// Applies `changes` to the current session.
    pub fn apply_changes_to_current(self, changes: &SessionChanges) -> Self {
        let current = self.current.clone();
        self.apply_changes_to(&current, changes)
    }

    /// Applies `changes` to the session with `key`; unknown keys are ignored.
    pub fn apply_changes_to(mut self, key: &str, changes: &SessionChanges) -> Self {
        if let Some(session) = self.sessions.iter_mut().find(|s| s.key == key) {
            *session = changes.apply_to(session);
        }
        self
    }

    /// Renames the session with `key`; unknown keys are ignored.
    pub fn rename_session(self, key: &str, name: impl Into<String>) -> Self {
        let changes = SessionChanges::new().name(name);
        self.apply_changes_to(key, &changes)
    }
}

fn seed_session(key: String, name: String, initial: &InitialData) -> Session {
    let mut session = Session::new(key, name);
    session.run_config_yaml = initial.run_config_yaml.clone();
    session.mode = initial.mode.clone();
    session.base = initial.base.clone();
    session
}

fn default_name(existing: usize) -> String {
    format!("{}-{}", UNNAMED_PREFIX, existing + 1)
}

fn generate_key(existing: &[Session]) -> String {
    loop {
        let key = format!("s{}", Uuid::new_v4().simple());
        if !existing.iter().any(|s| s.key == key) {
            return key;
        }
    }
}
