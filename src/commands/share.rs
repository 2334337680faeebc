//! Share CLI commands.

use clap::{Args, Subcommand, ValueEnum};

use crate::output::{self, OutputFormat, ShareRow};
use filedeck_core::error::AppError;
use filedeck_core::types::ShareId;
use filedeck_entity::{ItemKey, SharePermission};
use filedeck_service::DriveContext;

/// Arguments for share commands
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Share subcommand
    #[command(subcommand)]
    pub command: ShareCommand,
}

/// Access level granted by a share
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Permission {
    /// Read-only
    View,
    /// Read-write
    Edit,
}

impl From<Permission> for SharePermission {
    fn from(p: Permission) -> Self {
        match p {
            Permission::View => Self::View,
            Permission::Edit => Self::Edit,
        }
    }
}

/// Share subcommands
#[derive(Debug, Subcommand)]
pub enum ShareCommand {
    /// Items other accounts shared with you
    List,
    /// Shares you granted
    Sent,
    /// Share an item with another account
    Create {
        /// Item as folder:<id> or file:<id>
        #[arg(value_parser = super::parse_item)]
        item: ItemKey,
        /// Recipient email
        #[arg(short, long)]
        email: String,
        /// Access level
        #[arg(short, long, value_enum, default_value = "view")]
        permission: Permission,
    },
    /// Revoke a share you granted
    Revoke {
        /// Share ID
        id: String,
    },
}

/// Execute share commands
pub async fn execute(
    args: &ShareArgs,
    ctx: &DriveContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let shares = ctx.shares();

    match &args.command {
        ShareCommand::List => {
            let rows: Vec<ShareRow> = shares
                .shared_with_me()
                .await?
                .iter()
                .map(|s| ShareRow::new(s, true))
                .collect();
            output::print_list(&rows, format);
        }
        ShareCommand::Sent => {
            let rows: Vec<ShareRow> = shares
                .sent()
                .await?
                .iter()
                .map(|s| ShareRow::new(s, false))
                .collect();
            output::print_list(&rows, format);
        }
        ShareCommand::Create {
            item,
            email,
            permission,
        } => {
            shares.create(item, email, (*permission).into()).await?;
        }
        ShareCommand::Revoke { id } => {
            shares.revoke(&ShareId::from(id.as_str())).await?;
        }
    }

    Ok(())
}
