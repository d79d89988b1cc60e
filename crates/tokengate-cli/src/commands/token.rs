//! Token record inspection and revocation.

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::json;
use tabled::Tabled;

use tokengate_core::error::AppError;
use tokengate_core::models::{AuditLevel, TokenRecord};
use tokengate_core::traits::{AuditLog, TokenStore};
use tokengate_database::{AuditLogRepository, TokenRepository};

use super::Cli;
use crate::output::{self, OutputFormat};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Show the stored token record of a user (token values are not printed)
    Show {
        /// Username
        username: String,
    },
    /// Delete the stored token record of a user, ending their session
    Revoke {
        /// Username
        username: String,
    },
}

/// Token record display row
#[derive(Debug, Serialize, Tabled)]
struct TokenRow {
    /// Username
    username: String,
    /// Group
    group: String,
    /// Access token expiry
    access_expires_at: String,
    /// Refresh token expiry
    refresh_expires_at: String,
    /// Last write
    updated_at: String,
}

impl From<&TokenRecord> for TokenRow {
    fn from(record: &TokenRecord) -> Self {
        let instant = |at: Option<chrono::DateTime<chrono::Utc>>| {
            at.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        Self {
            username: record.username.clone(),
            group: record.group_id.clone().unwrap_or_else(|| "-".to_string()),
            access_expires_at: instant(record.expires_at_access),
            refresh_expires_at: instant(record.expires_at_refresh),
            updated_at: instant(Some(record.updated_at)),
        }
    }
}

/// Execute token commands
pub async fn execute(args: &TokenArgs, cli: &Cli, format: OutputFormat) -> Result<(), AppError> {
    let config = cli.load_config()?;
    let pool = super::create_db_pool(&config).await?;
    let tokens = TokenRepository::new(pool.pool().clone());

    let result = match &args.command {
        TokenCommand::Show { username } => match tokens.find(username).await? {
            Some(record) => {
                output::print_list(&[TokenRow::from(&record)], format);
                Ok(())
            }
            None => Err(AppError::token_not_found(format!(
                "No token record for '{username}'"
            ))),
        },
        TokenCommand::Revoke { username } => {
            if tokens.delete(username).await? {
                if config.auth.audit_enabled {
                    AuditLogRepository::new(pool.pool().clone())
                        .record(
                            AuditLevel::Info,
                            "Session revoked",
                            json!({ "username": username, "source": "cli" }),
                        )
                        .await;
                }
                output::print_success(&format!("Session of '{username}' revoked"));
                Ok(())
            } else {
                Err(AppError::token_not_found(format!(
                    "No token record for '{username}'"
                )))
            }
        }
    };

    pool.close().await;
    result
}
