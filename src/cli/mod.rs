// ABOUTME: CLI argument parsing and command routing for hsh-admin
//
// Provides command-line interface for:
// - Running the setup wizard (setup, default)
// - Inspecting the backend (env, status, libraries)
// - Managing collections (collections, search, show, add, remove, update, poster)

pub mod collections;
pub mod server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::api::AdminClient;
use crate::config::AppConfig;

/// Admin console for a Homescreen Hero server
#[derive(Parser)]
#[command(name = "hsh-admin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend URL (overrides config file and HSH_ADMIN_URL)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the setup wizard (default if no command given)
    Setup(SetupArgs),

    /// Show which settings the server environment already provides
    Env,

    /// Check whether the server is configured and Trakt is reachable
    Status,

    /// List Plex libraries
    Libraries,

    /// List collections
    Collections(CollectionsArgs),

    /// Search a library
    Search(SearchArgs),

    /// Show one collection and its items
    Show(CollectionRef),

    /// Add items to a collection
    Add(ItemsArgs),

    /// Remove an item from a collection
    Remove(RemoveArgs),

    /// Rename a collection or change its summary
    Update(UpdateArgs),

    /// Upload a poster from a file or URL
    Poster(PosterArgs),
}

#[derive(clap::Args, Default)]
pub struct SetupArgs {
    /// Run even if setup was already completed
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct CollectionsArgs {
    /// Only collections in this library
    #[arg(long)]
    pub library: Option<String>,

    /// Only collections currently featured on the homescreen
    #[arg(long)]
    pub active: bool,
}

#[derive(clap::Args)]
pub struct SearchArgs {
    pub library: String,
    pub query: String,
}

#[derive(clap::Args)]
pub struct CollectionRef {
    pub library: String,
    pub collection: String,
}

#[derive(clap::Args)]
pub struct ItemsArgs {
    #[command(flatten)]
    pub target: CollectionRef,

    /// Rating keys of the items to add
    #[arg(required = true)]
    pub rating_keys: Vec<String>,
}

#[derive(clap::Args)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub target: CollectionRef,

    pub rating_key: String,
}

#[derive(clap::Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub target: CollectionRef,

    /// New collection title
    #[arg(long)]
    pub title: Option<String>,

    /// New collection summary
    #[arg(long)]
    pub summary: Option<String>,
}

#[derive(clap::Args)]
pub struct PosterArgs {
    #[command(flatten)]
    pub target: CollectionRef,

    /// Image file path or http(s) URL
    pub source: String,
}

impl Cli {
    /// Load the config file and apply environment and flag overrides
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load()?;
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        Ok(config)
    }
}

/// Build a client for the configured backend, logging in when credentials are set
pub async fn connect(config: &AppConfig) -> Result<AdminClient> {
    let mut client = AdminClient::from_config(config)?;
    if let Some((username, password)) = config.credentials() {
        client
            .login(username, password)
            .await
            .with_context(|| format!("Login to {} failed", config.server_url))?;
    }
    Ok(client)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}
