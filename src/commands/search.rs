//! Search CLI command.

use clap::Args;

use crate::output::{self, ItemRow, OutputFormat};
use filedeck_core::error::AppError;
use filedeck_service::DriveContext;

/// Arguments for the search command
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Name fragment to look for
    pub query: String,
}

/// Execute the search command
pub async fn execute(
    args: &SearchArgs,
    ctx: &DriveContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let results = ctx.search().search(&args.query).await?;
    output::print_list(&ItemRow::listing(&results.folders, &results.files), format);
    Ok(())
}
