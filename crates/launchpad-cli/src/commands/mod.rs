pub mod output;
pub mod scope;
pub mod session;

use anyhow::{Result, bail};
use launchpad_application::{LaunchpadSessionController, SessionStore, TransientSession};
use launchpad_core::config::LaunchpadConfig;
use launchpad_core::descriptor::SessionScope;
use launchpad_core::session::{SessionChanges, SessionSet};
use scope::ScopeArgs;
use session::EditArgs;

/// A launchpad opened for one command.
enum Opened {
    /// Job launchpad: sessions are stored under this scope
    Stored(SessionScope),
    /// Asset launchpad: a single session that is never persisted
    Transient(TransientSession),
}

pub struct App {
    controller: LaunchpadSessionController,
}

impl App {
    pub fn new(config: &LaunchpadConfig) -> Result<Self> {
        let store = SessionStore::from_config(config)?;
        Ok(Self {
            controller: LaunchpadSessionController::new(store),
        })
    }

    async fn open(&self, args: &ScopeArgs) -> Result<Opened> {
        let target = args.resolve()?;
        if !target.kind.uses_stored_sessions() {
            tracing::debug!(pipeline = %args.pipeline, kind = %target.kind, "Opening transient session");
            return Ok(Opened::Transient(TransientSession::for_pipeline(
                &target.pipeline,
                &target.partition_sets,
                target.root_default_yaml.as_deref(),
                &SessionChanges::new(),
            )));
        }

        let scope = args.scope();
        self.controller
            .enter(
                &scope,
                &target.pipeline,
                &target.partition_sets,
                target.root_default_yaml.as_deref(),
            )
            .await?;
        Ok(Opened::Stored(scope))
    }

    async fn open_stored(&self, args: &ScopeArgs) -> Result<SessionScope> {
        match self.open(args).await? {
            Opened::Stored(scope) => Ok(scope),
            Opened::Transient(_) => bail!(
                "Sessions of the asset launchpad '{}' are not stored; use `show` to inspect them",
                args.pipeline
            ),
        }
    }

    pub async fn show(&self, args: &ScopeArgs, json: bool) -> Result<()> {
        let (session, transient) = match self.open(args).await? {
            Opened::Stored(scope) => match self.controller.current(&scope).await {
                Some(session) => (session, false),
                None => bail!("Scope '{}' is still loading", scope),
            },
            Opened::Transient(transient) => (transient.into_session(), true),
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&session)?);
        } else {
            output::print_session(&session, transient);
        }
        Ok(())
    }

    pub async fn list(&self, args: &ScopeArgs) -> Result<()> {
        match self.open(args).await? {
            Opened::Stored(scope) => output::print_tabs(&self.stored_set(&scope).await?),
            Opened::Transient(transient) => output::print_session(transient.session(), true),
        }
        Ok(())
    }

    pub async fn create(&self, args: &ScopeArgs) -> Result<()> {
        let scope = self.open_stored(args).await?;
        let session = self.controller.on_create(&scope).await?;
        println!("Created {} ({})", session.name, session.key);
        Ok(())
    }

    pub async fn delete(&self, args: &ScopeArgs, key: &str) -> Result<()> {
        let scope = self.open_stored(args).await?;
        let current = self.controller.on_delete(&scope, key).await?;
        println!("Current session: {} ({})", current.name, current.key);
        Ok(())
    }

    pub async fn switch(&self, args: &ScopeArgs, key: &str) -> Result<()> {
        let scope = self.open_stored(args).await?;
        let current = self.controller.on_set_current(&scope, key).await?;
        if current.key != key {
            eprintln!("No session '{}' in {}, keeping the current one", key, scope);
        }
        println!("Current session: {} ({})", current.name, current.key);
        Ok(())
    }

    pub async fn rename(&self, args: &ScopeArgs, key: &str, name: &str) -> Result<()> {
        let scope = self.open_stored(args).await?;
        self.controller.on_rename(&scope, key, name).await?;
        output::print_tabs(&self.stored_set(&scope).await?);
        Ok(())
    }

    pub async fn edit(&self, args: &ScopeArgs, edit: &EditArgs) -> Result<()> {
        let changes = edit.to_changes()?;
        let scope = self.open_stored(args).await?;
        let session = self.controller.on_save(&scope, &changes).await?;
        output::print_session(&session, false);
        Ok(())
    }

    pub async fn scopes(&self) -> Result<()> {
        for scope in self.controller.store().list_scopes().await? {
            println!("{}", scope);
        }
        Ok(())
    }

    pub async fn clear(&self, args: &ScopeArgs) -> Result<()> {
        let scope = args.scope();
        self.controller.store().clear(&scope).await?;
        println!("Cleared {}", scope);
        Ok(())
    }

    async fn stored_set(&self, scope: &SessionScope) -> Result<SessionSet> {
        match self.controller.session_set(scope).await {
            Some(set) => Ok(set),
            None => bail!("Scope '{}' is still loading", scope),
        }
    }
}
