//! Folder browsing and single-item CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use dialoguer::{Confirm, Select};

use crate::output::{self, ItemRow, OutputFormat};
use filedeck_core::error::AppError;
use filedeck_core::types::{FileId, FolderId};
use filedeck_entity::ItemKey;
use filedeck_entity::breadcrumb::display_path;
use filedeck_service::DriveContext;

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List a folder's contents (root when omitted)
    List {
        /// Folder ID
        folder: Option<String>,
    },
    /// Create a sub-folder
    Create {
        /// Folder name
        name: String,
        /// Parent folder ID (omit for root)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Rename a folder or file
    Rename {
        /// Item as folder:<id> or file:<id>
        #[arg(value_parser = super::parse_item)]
        item: ItemKey,
        /// New name
        name: String,
        /// Folder the item is listed in
        #[arg(long = "in")]
        within: Option<String>,
    },
    /// Move a folder or file to the trash
    Delete {
        /// Item as folder:<id> or file:<id>
        #[arg(value_parser = super::parse_item)]
        item: ItemKey,
        /// Folder the item is listed in
        #[arg(long = "in")]
        within: Option<String>,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a folder or file to another folder
    Move {
        /// Item as folder:<id> or file:<id>
        #[arg(value_parser = super::parse_item)]
        item: ItemKey,
        /// Destination folder ID, `/` for root (prompts when omitted)
        #[arg(short, long)]
        to: Option<String>,
        /// Folder the item is listed in
        #[arg(long = "in")]
        within: Option<String>,
    },
    /// Download a file
    Download {
        /// File ID
        id: String,
        /// Output path (defaults to the file's name)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Folder the file is listed in
        #[arg(long = "in")]
        within: Option<String>,
    },
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    ctx: &DriveContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let browser = ctx.browser();

    match &args.command {
        FolderCommand::List { folder } => {
            browser.open(super::folder_arg(folder.as_deref())).await?;
            let contents = browser.contents().await;
            let rows = ItemRow::listing(&contents.folders, &contents.files);

            if format == OutputFormat::Table {
                output::print_breadcrumbs(&browser.breadcrumbs().await);
            }
            output::print_list(&rows, format);
            if format == OutputFormat::Table
                && let Some(storage) = browser.storage().await
            {
                output::print_kv(
                    "Storage",
                    &format!(
                        "{} of {} ({:.0}%)",
                        output::format_bytes(storage.used),
                        output::format_bytes(storage.quota),
                        storage.ratio() * 100.0
                    ),
                );
            }
        }
        FolderCommand::Create { name, parent } => {
            browser.open(super::folder_arg(parent.as_deref())).await?;
            let folder = browser.create_folder(name).await?;
            if format == OutputFormat::Json {
                output::print_item(&folder, format);
            }
        }
        FolderCommand::Rename { item, name, within } => {
            browser.open(super::folder_arg(within.as_deref())).await?;
            browser.rename(item, name).await?;
        }
        FolderCommand::Delete { item, within, yes } => {
            browser.open(super::folder_arg(within.as_deref())).await?;
            if !*yes && !confirm(&format!("Move {item} to the trash?"))? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            browser.delete_item(item).await?;
        }
        FolderCommand::Move { item, to, within } => {
            let origin = super::folder_arg(within.as_deref());
            browser.open(origin.clone()).await?;

            let target = match to {
                Some(to) => super::folder_arg(Some(to)),
                None => match pick_destination(ctx, origin).await? {
                    Some(target) => target,
                    None => {
                        output::print_warning("Cancelled");
                        return Ok(());
                    }
                },
            };
            browser.move_item(item, target).await?;
        }
        FolderCommand::Download { id, output: out, within } => {
            browser.open(super::folder_arg(within.as_deref())).await?;
            let id = FileId::from(id.as_str());
            let path = match out {
                Some(path) => path.clone(),
                None => PathBuf::from(
                    browser
                        .contents()
                        .await
                        .files
                        .iter()
                        .find(|f| f.id == id)
                        .map_or_else(|| id.to_string(), |f| f.name.clone()),
                ),
            };

            let bytes = browser.download_file(&id).await?;
            tokio::fs::write(&path, &bytes)
                .await
                .map_err(|e| AppError::internal(format!("Failed to write {}: {}", path.display(), e)))?;
            output::print_kv("Saved to", &path.display().to_string());
        }
    }

    Ok(())
}

/// Let the user walk the folder tree and pick a destination.
///
/// Returns `None` when the picker is dismissed, `Some(None)` for the root.
pub async fn pick_destination(
    ctx: &DriveContext,
    initial: Option<FolderId>,
) -> Result<Option<Option<FolderId>>, AppError> {
    let picker = ctx.picker(initial).await;

    loop {
        let folders = picker.folders().await;
        let depth = picker.depth().await;

        let mut choices = vec!["[Move here]".to_string(), "[Root]".to_string()];
        if depth > 0 {
            choices.push("[Back]".to_string());
        }
        let fixed = choices.len();
        choices.extend(folders.iter().map(|f| format!("{}/", f.name)));

        let selection = Select::new()
            .with_prompt(display_path(&picker.breadcrumbs().await))
            .items(&choices)
            .default(0)
            .interact_opt()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

        match selection {
            None => return Ok(None),
            Some(0) => return Ok(Some(picker.confirm())),
            Some(1) => picker.go_to_root().await,
            Some(2) if depth > 0 => {
                picker.go_back().await;
            }
            Some(i) => {
                if let Some(folder) = folders.get(i - fixed) {
                    picker.enter_folder(folder.clone()).await;
                }
            }
        }
    }
}

/// Helper: ask a yes/no question, defaulting to no
pub fn confirm(prompt: &str) -> Result<bool, AppError> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}
