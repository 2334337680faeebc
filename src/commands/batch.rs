//! Batch CLI commands: one request for many items.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use filedeck_core::error::AppError;
use filedeck_entity::ItemKey;
use filedeck_service::{BatchSummary, DriveContext};

/// Arguments for batch commands
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Batch subcommand
    #[command(subcommand)]
    pub command: BatchCommand,
}

/// Batch subcommands
#[derive(Debug, Subcommand)]
pub enum BatchCommand {
    /// Move several items to the trash
    Delete {
        /// Items as folder:<id> or file:<id>
        #[arg(required = true, value_parser = super::parse_item)]
        items: Vec<ItemKey>,
        /// Folder the items are listed in
        #[arg(long = "in")]
        within: Option<String>,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Move several items to one folder
    Move {
        /// Items as folder:<id> or file:<id>
        #[arg(required = true, value_parser = super::parse_item)]
        items: Vec<ItemKey>,
        /// Destination folder ID, `/` for root (prompts when omitted)
        #[arg(short, long)]
        to: Option<String>,
        /// Folder the items are listed in
        #[arg(long = "in")]
        within: Option<String>,
    },
    /// Restore several items from the trash
    Restore {
        /// Items as folder:<id> or file:<id>
        #[arg(required = true, value_parser = super::parse_item)]
        items: Vec<ItemKey>,
    },
}

/// Execute batch commands
pub async fn execute(
    args: &BatchArgs,
    ctx: &DriveContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let summary = match &args.command {
        BatchCommand::Delete { items, within, yes } => {
            let browser = ctx.browser();
            browser.open(super::folder_arg(within.as_deref())).await?;
            if !*yes && !super::folder::confirm(&format!("Move {} items to the trash?", items.len()))? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            for item in items {
                browser.toggle(item.clone()).await;
            }
            browser.batch_delete().await?
        }
        BatchCommand::Move { items, to, within } => {
            let origin = super::folder_arg(within.as_deref());
            let browser = ctx.browser();
            browser.open(origin.clone()).await?;

            let target = match to {
                Some(to) => super::folder_arg(Some(to)),
                None => match super::folder::pick_destination(ctx, origin).await? {
                    Some(target) => target,
                    None => {
                        output::print_warning("Cancelled");
                        return Ok(());
                    }
                },
            };
            for item in items {
                browser.toggle(item.clone()).await;
            }
            browser.batch_move(target).await?
        }
        BatchCommand::Restore { items } => {
            let trash = ctx.trash();
            trash.load().await?;
            for item in items {
                trash.toggle(item.clone()).await;
            }
            trash.batch_restore().await?
        }
    };

    print_failures(&summary, format);
    Ok(())
}

/// Per-item errors the service reported for a partially applied batch.
fn print_failures(summary: &BatchSummary, format: OutputFormat) {
    if summary.result.errors.is_empty() {
        return;
    }
    match format {
        OutputFormat::Json => output::print_item(&summary.result, format),
        OutputFormat::Table => {
            for failure in &summary.result.errors {
                output::print_kv(&failure.id, &failure.error);
            }
        }
    }
}
