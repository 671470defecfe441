use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// kbox - manage vector store documents and chat against them
#[derive(Debug, Parser)]
#[command(name = "kbox", version, about)]
pub struct Cli {
    /// Settings file (defaults to <config dir>/knowledge-ox/settings.json)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// API root for compatible endpoints
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show or change stored settings
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
    /// Manage documents in the configured vector store
    Files {
        #[command(subcommand)]
        action: FilesCommand,
    },
    /// Manage vector stores
    Store {
        #[command(subcommand)]
        action: StoreCommand,
    },
    /// Ask a single question
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive conversation; an empty line or EOF ends it
    Chat,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    Show,
    Set {
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        vector_store_id: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum FilesCommand {
    List,
    Upload {
        path: PathBuf,
    },
    /// Upload a new version, then remove the old one
    Replace {
        file_id: String,
        path: PathBuf,
    },
    Delete {
        file_id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum StoreCommand {
    Create {
        name: String,
        /// Make the new store the configured one
        #[arg(long = "use")]
        use_store: bool,
    },
}
