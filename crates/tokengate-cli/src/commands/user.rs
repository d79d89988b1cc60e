//! User management CLI commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use tokengate_auth::PasswordHasher;
use tokengate_core::error::AppError;
use tokengate_database::UserRepository;

use super::Cli;
use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user with an Argon2id password hash
    Create {
        /// Username
        #[arg(long)]
        username: String,
        /// Group
        #[arg(long)]
        group: String,
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Print the Argon2id hash of a password, for seeding a directory
    HashPassword {
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// Subject ID
    subject_id: String,
    /// Username
    username: String,
    /// Group
    group: String,
}

/// Execute user commands
pub async fn execute(args: &UserArgs, cli: &Cli, format: OutputFormat) -> Result<(), AppError> {
    let hasher = Arc::new(PasswordHasher::new());

    match &args.command {
        UserCommand::Create {
            username,
            group,
            password,
        } => {
            let password = resolve_password(password.as_deref())?;
            let hash = hash_blocking(&hasher, password).await?;

            let config = cli.load_config()?;
            let pool = super::create_db_pool(&config).await?;
            let identity = UserRepository::new(pool.pool().clone())
                .create(username, &hash, group)
                .await?;
            pool.close().await;

            output::print_list(
                &[UserRow {
                    subject_id: identity.subject_id.to_string(),
                    username: identity.username,
                    group: identity.group_id,
                }],
                format,
            );
            output::print_success(&format!("User '{username}' created"));
        }
        UserCommand::HashPassword { password } => {
            let password = resolve_password(password.as_deref())?;
            println!("{}", hash_blocking(&hasher, password).await?);
        }
    }

    Ok(())
}

fn resolve_password(given: Option<&str>) -> Result<String, AppError> {
    match given {
        Some(password) => Ok(password.to_string()),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}

async fn hash_blocking(hasher: &Arc<PasswordHasher>, password: String) -> Result<String, AppError> {
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || hasher.hash_password(&password))
        .await
        .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
}
