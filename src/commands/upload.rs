//! Upload CLI commands.

use std::path::PathBuf;

use clap::Args;

use crate::output::{self, ItemRow, OutputFormat};
use filedeck_core::error::AppError;
use filedeck_service::{DriveContext, FileInput};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Files to upload, each as its own request
    #[arg(required_unless_present = "dir", conflicts_with = "dir")]
    pub files: Vec<PathBuf>,

    /// Upload a directory, recreating its tree remotely
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Destination folder ID (omit for root)
    #[arg(short, long)]
    pub to: Option<String>,
}

/// Execute the upload command
pub async fn execute(
    args: &UploadArgs,
    ctx: &DriveContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let target = super::folder_arg(args.to.as_deref());
    let browser = ctx.browser();
    browser.open(target.clone()).await?;
    let uploads = ctx.uploads();

    match &args.dir {
        Some(dir) => {
            let mut input = FileInput::from_directory(dir).await?;
            output::print_kv("Files", &input.len().to_string());
            uploads
                .upload_folder(&mut input, target.as_ref(), &browser)
                .await?;
        }
        None => {
            let mut input = FileInput::from_files(&args.files).await?;
            let files = uploads
                .upload_files(&mut input, target.as_ref(), &browser)
                .await?;
            output::print_list(&ItemRow::listing(&[], &files), format);
        }
    }

    Ok(())
}
