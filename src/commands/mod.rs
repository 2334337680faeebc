//! CLI command definitions and dispatch.

pub mod batch;
pub mod config;
pub mod folder;
pub mod search;
pub mod share;
pub mod trash;
pub mod upload;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::console::ConsoleNotifier;
use crate::output::OutputFormat;
use filedeck_core::config::AppConfig;
use filedeck_core::error::AppError;
use filedeck_core::types::FolderId;
use filedeck_entity::ItemKey;
use filedeck_service::{DriveContext, LogNotifier, Notifier};

/// FileDeck: browse and organize a remote drive from the terminal
#[derive(Debug, Parser)]
#[command(name = "filedeck", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file (extension optional)
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded from `config/<env>`
    #[arg(short, long, default_value = "development", env = "FILEDECK_ENV")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Send status messages to the log instead of the terminal
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse folders and act on single items
    Folder(folder::FolderArgs),
    /// Apply one operation to several items at once
    Batch(batch::BatchArgs),
    /// Upload files or a whole directory
    Upload(upload::UploadArgs),
    /// Trash listing, restore and purge
    Trash(trash::TrashArgs),
    /// Shares with and from other accounts
    Share(share::ShareArgs),
    /// Search files and folders by name
    Search(search::SearchArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Load the configuration this invocation runs with.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        if let Commands::Config(args) = &self.command {
            return config::execute(args, &config, self.format).await;
        }

        let ctx = connect(config, self.quiet)?;
        match &self.command {
            Commands::Folder(args) => folder::execute(args, &ctx, self.format).await,
            Commands::Batch(args) => batch::execute(args, &ctx, self.format).await,
            Commands::Upload(args) => upload::execute(args, &ctx, self.format).await,
            Commands::Trash(args) => trash::execute(args, &ctx, self.format).await,
            Commands::Share(args) => share::execute(args, &ctx, self.format).await,
            Commands::Search(args) => search::execute(args, &ctx, self.format).await,
            Commands::Config(_) => Ok(()),
        }
    }
}

/// Helper: build a drive context reporting to the terminal, or to the log when quiet
pub fn connect(config: AppConfig, quiet: bool) -> Result<DriveContext, AppError> {
    let notifier: Arc<dyn Notifier> = if quiet {
        Arc::new(LogNotifier)
    } else {
        Arc::new(ConsoleNotifier)
    };
    DriveContext::connect(config, notifier)
}

/// Parse an item reference written as `folder:<id>` or `file:<id>`.
pub fn parse_item(value: &str) -> Result<ItemKey, String> {
    let (kind, id) = value
        .split_once(':')
        .ok_or_else(|| format!("expected folder:<id> or file:<id>, got '{value}'"))?;
    if id.is_empty() {
        return Err(format!("missing id in '{value}'"));
    }
    let entity_type = kind.parse().map_err(|e: AppError| e.message)?;
    Ok(ItemKey::new(id, entity_type))
}

/// Helper: `None` when the folder argument is absent or names the root.
pub fn folder_arg(value: Option<&str>) -> Option<FolderId> {
    value
        .filter(|v| !v.is_empty() && *v != "/" && *v != "root")
        .map(FolderId::from)
}
