//! Trash CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, ItemRow, OutputFormat};
use filedeck_core::error::AppError;
use filedeck_entity::ItemKey;
use filedeck_service::DriveContext;

/// Arguments for trash commands
#[derive(Debug, Args)]
pub struct TrashArgs {
    /// Trash subcommand
    #[command(subcommand)]
    pub command: TrashCommand,
}

/// Trash subcommands
#[derive(Debug, Subcommand)]
pub enum TrashCommand {
    /// List trashed items
    List,
    /// Restore one item
    Restore {
        /// Item as folder:<id> or file:<id>
        #[arg(value_parser = super::parse_item)]
        item: ItemKey,
    },
    /// Delete one item permanently
    Purge {
        /// Item as folder:<id> or file:<id>
        #[arg(value_parser = super::parse_item)]
        item: ItemKey,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Execute trash commands
pub async fn execute(
    args: &TrashArgs,
    ctx: &DriveContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let trash = ctx.trash();
    let contents = trash.load().await?;

    match &args.command {
        TrashCommand::List => {
            output::print_list(&ItemRow::listing(&contents.folders, &contents.files), format);
        }
        TrashCommand::Restore { item } => {
            trash.restore(item).await?;
        }
        TrashCommand::Purge { item, yes } => {
            if !*yes && !super::folder::confirm(&format!("Permanently delete {item}? This cannot be undone"))? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            trash.delete_permanently(item).await?;
        }
    }

    Ok(())
}
