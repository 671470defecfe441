//! kbox - command-line front end for knowledge-ox

use anyhow::{Context, Result};
use clap::Parser as _;
use knowledge_ox::{JsonFileStore, KnowledgeClient};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

mod cli;
mod handlers;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let path = cli
        .settings
        .or_else(handlers::default_settings_path)
        .context("No config directory found; pass --settings")?;
    let store = JsonFileStore::new(path);
    let settings = handlers::load_settings(&store);

    let client = match cli.base_url {
        Some(base_url) => KnowledgeClient::builder().base_url(base_url).build(),
        None => KnowledgeClient::new(),
    };

    match cli.command {
        Command::Config { action } => handlers::handle_config(&store, action),
        Command::Files { action } => handlers::handle_files(&client, &settings, action).await,
        Command::Store { action } => {
            handlers::handle_store(&client, &store, &settings, action).await
        }
        Command::Ask { question } => {
            handlers::handle_ask(&client, &settings, &question.join(" ")).await
        }
        Command::Chat => handlers::handle_chat(&client, &settings).await,
    }
}
