//! TOML-based SessionSetRepository implementation

use crate::dto::{SESSION_SET_SCHEMA_VERSION, SessionSetDTO, SessionSetV1_0_0};
use crate::paths::LaunchpadPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use launchpad_core::descriptor::SessionScope;
use launchpad_core::error::{LaunchpadError, Result};
use launchpad_core::session::{SessionSet, SessionSetRepository, StoredSessionSet};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use version_migrate::MigratesTo;

/// Only the version marker, read before choosing a DTO.
#[derive(Deserialize)]
struct SchemaProbe {
    #[serde(default)]
    schema_version: Option<String>,
}

/// Stores each scope's session set in its own TOML file.
///
/// ```text
/// sessions_dir/
/// ├── 0b7c...e1.toml    # one file per scope, named by UUIDv5 of its storage key
/// └── 0b7c...e1.lock    # writer lock
/// ```
///
/// Files are written with [`AtomicTomlFile`], so readers never observe a
/// partially written set. Legacy 1.0.0 files are migrated when read and
/// rewritten in the current schema on the next save.
pub struct TomlSessionSetRepository {
    sessions_dir: PathBuf,
}

impl TomlSessionSetRepository {
    /// Creates a repository rooted at `sessions_dir`, creating the directory.
    pub fn new(sessions_dir: impl AsRef<Path>) -> Result<Self> {
        let sessions_dir = sessions_dir.as_ref().to_path_buf();
        fs::create_dir_all(&sessions_dir)?;
        Ok(Self { sessions_dir })
    }

    /// Creates a repository in the platform sessions directory.
    pub fn default_location() -> Result<Self> {
        Self::new(LaunchpadPaths::sessions_dir()?)
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    /// File holding the set of `scope`, whether or not it exists yet.
    pub fn scope_file_path(&self, scope: &SessionScope) -> PathBuf {
        let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, scope.storage_key().as_bytes());
        self.sessions_dir.join(format!("{}.toml", id))
    }

    fn scope_file(&self, scope: &SessionScope) -> AtomicTomlFile<SessionSetDTO> {
        AtomicTomlFile::new(self.scope_file_path(scope))
    }

    /// Reads a session set file, migrating older schemas. The sessions are
    /// returned as stored; healing is left to the caller.
    fn load_from_path(path: &Path) -> Result<Option<(SessionScope, StoredSessionSet)>> {
        let file = AtomicTomlFile::<SessionSetDTO>::new(path.to_path_buf());
        let Some(content) = file.read_raw()? else {
            return Ok(None);
        };

        let probe: SchemaProbe = toml::from_str(&content)?;
        let dto: SessionSetDTO = match probe.schema_version.as_deref() {
            Some(SESSION_SET_SCHEMA_VERSION) => toml::from_str(&content)?,
            None => {
                tracing::info!("Migrating session set from 1.0.0 to {}: {:?}", SESSION_SET_SCHEMA_VERSION, path);
                let legacy: SessionSetV1_0_0 = toml::from_str(&content)?;
                legacy.migrate()
            }
            Some(other) => {
                return Err(LaunchpadError::migration(format!(
                    "Unsupported session set schema version '{}' in {:?}",
                    other, path
                )));
            }
        };

        let (scope, sessions, current) = dto.into_parts();
        Ok(Some((scope, StoredSessionSet::new(sessions, current))))
    }
}

#[async_trait]
impl SessionSetRepository for TomlSessionSetRepository {
    async fn find(&self, scope: &SessionScope) -> Result<Option<StoredSessionSet>> {
        let path = self.scope_file_path(scope);
        let requested = scope.clone();

        tokio::task::spawn_blocking(move || {
            let Some((stored_scope, stored)) = Self::load_from_path(&path)? else {
                return Ok(None);
            };
            if stored_scope != requested {
                return Err(LaunchpadError::data_access(format!(
                    "Session file {:?} belongs to {:?}, expected {:?}",
                    path, stored_scope, requested
                )));
            }
            Ok(Some(stored))
        })
        .await
        .map_err(|e| LaunchpadError::internal(format!("Failed to join task: {}", e)))?
    }

    async fn save(&self, scope: &SessionScope, set: &SessionSet) -> Result<()> {
        let file = self.scope_file(scope);
        let dto = SessionSetDTO::new(scope, set.current_key(), set.sessions());

        tokio::task::spawn_blocking(move || file.save(&dto).map_err(LaunchpadError::from))
            .await
            .map_err(|e| LaunchpadError::internal(format!("Failed to join task: {}", e)))??;

        tracing::debug!(scope = %scope, sessions = set.len(), "Saved session set");
        Ok(())
    }

    async fn delete(&self, scope: &SessionScope) -> Result<()> {
        let file = self.scope_file(scope);

        tokio::task::spawn_blocking(move || file.remove().map_err(LaunchpadError::from))
            .await
            .map_err(|e| LaunchpadError::internal(format!("Failed to join task: {}", e)))??;

        tracing::debug!(scope = %scope, "Deleted session set");
        Ok(())
    }

    async fn list_scopes(&self) -> Result<Vec<SessionScope>> {
        let sessions_dir = self.sessions_dir.clone();

        tokio::task::spawn_blocking(move || {
            let mut scopes = Vec::new();
            for entry in fs::read_dir(&sessions_dir)? {
                let path = entry?.path();
                if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                    continue;
                }
                match Self::load_from_path(&path) {
                    Ok(Some((scope, _))) => scopes.push(scope),
                    Ok(None) => {}
                    Err(e) => tracing::warn!("Skipping unreadable session file {:?}: {}", path, e),
                }
            }
            scopes.sort();
            Ok(scopes)
        })
        .await
        .map_err(|e| LaunchpadError::internal(format!("Failed to join task: {}", e)))?
    }
}
