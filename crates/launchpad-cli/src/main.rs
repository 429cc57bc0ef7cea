use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use launchpad_core::config::LaunchpadConfig;
use launchpad_infrastructure::ConfigService;
use std::path::PathBuf;

mod commands;

use commands::scope::ScopeArgs;
use commands::session::EditArgs;

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Launchpad CLI - run configuration sessions per repository and pipeline", long_about = None)]
struct Cli {
    /// Config file (defaults to $LAUNCHPAD_CONFIG, then ~/.config/launchpad/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current session of a scope
    Show {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Print the session as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the sessions (tabs) of a scope
    List {
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Create a session and make it current
    Create {
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Delete a session
    Delete {
        #[command(flatten)]
        scope: ScopeArgs,
        key: String,
    },
    /// Make a session current
    Switch {
        #[command(flatten)]
        scope: ScopeArgs,
        key: String,
    },
    /// Rename a session
    Rename {
        #[command(flatten)]
        scope: ScopeArgs,
        key: String,
        name: String,
    },
    /// Edit the current session
    Edit {
        #[command(flatten)]
        scope: ScopeArgs,
        #[command(flatten)]
        edit: EditArgs,
    },
    /// List scopes with stored sessions
    Scopes,
    /// Forget every stored session of a scope
    Clear {
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<LaunchpadConfig> {
    let service = match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new().context("Failed to resolve config path")?,
    };
    service
        .load()
        .with_context(|| format!("Failed to load config from {:?}", service.path()))
}

fn init_logging(config: &LaunchpadConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config)?;
    init_logging(&config);

    let app = commands::App::new(&config)?;

    match cli.command {
        Commands::Show { scope, json } => app.show(&scope, json).await?,
        Commands::List { scope } => app.list(&scope).await?,
        Commands::Create { scope } => app.create(&scope).await?,
        Commands::Delete { scope, key } => app.delete(&scope, &key).await?,
        Commands::Switch { scope, key } => app.switch(&scope, &key).await?,
        Commands::Rename { scope, key, name } => app.rename(&scope, &key, &name).await?,
        Commands::Edit { scope, edit } => app.edit(&scope, &edit).await?,
        Commands::Scopes => app.scopes().await?,
        Commands::Clear { scope } => app.clear(&scope).await?,
    }

    Ok(())
}
