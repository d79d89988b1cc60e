//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use tokengate_core::config::PLACEHOLDER_SECRET;
use tokengate_core::error::AppError;
use tokengate_database::connection::mask_password;

use super::Cli;
use crate::output::{self, OutputFormat};

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
    /// Show the effective configuration (secrets omitted)
    Show,
    /// Validate the configuration
    Validate,
}

/// Execute config commands
pub async fn execute(args: &ConfigArgs, cli: &Cli, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut config = cli.load_config()?;
            config.database.url = mask_password(&config.database.url);
            output::print_item(&config, format);
        }
        ConfigCommand::Validate => match cli.load_config() {
            Ok(config) => {
                output::print_success(&format!("Configuration '{}' is valid", cli.config));
                output::print_kv(
                    "Server",
                    &format!("{}:{}", config.server.host, config.server.port),
                );
                output::print_kv("Database", &mask_password(&config.database.url));
                output::print_kv("Access TTL", &config.auth.access_token_ttl.to_string());
                output::print_kv("Refresh TTL", &config.auth.refresh_token_ttl.to_string());
                output::print_kv("Cookie path", &config.auth.cookie_path);
                if config.auth.jwt_secret == PLACEHOLDER_SECRET {
                    output::print_kv("Warning", "jwt_secret is still the placeholder");
                }
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}
