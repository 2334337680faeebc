//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use filedeck_core::config::AppConfig;
use filedeck_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with credentials masked
    Show,
    /// Check that the configured base URL and credentials look usable
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            output::print_item(&masked(config), format);
        }
        ConfigCommand::Validate => {
            if let Err(e) = super::connect(config.clone(), true) {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
            output::print_success("Configuration is valid");
            output::print_kv("API", &config.api.base_url);
            output::print_kv("Timeout", &format!("{}s", config.api.timeout_seconds));
            if config.api.bearer_token.is_none() && config.api.session_cookie.is_none() {
                output::print_warning("No bearer token or session cookie configured");
            }
        }
    }

    Ok(())
}

/// Copy of the config with secrets replaced
fn masked(config: &AppConfig) -> AppConfig {
    let mut config = config.clone();
    if config.api.bearer_token.is_some() {
        config.api.bearer_token = Some("****".to_string());
    }
    if config.api.session_cookie.is_some() {
        config.api.session_cookie = Some("****".to_string());
    }
    config
}
