//! CLI command definitions and dispatch.

pub mod config;
pub mod migrate;
pub mod token;
pub mod user;

use clap::{Parser, Subcommand};

use tokengate_core::config::AppConfig;
use tokengate_core::error::AppError;
use tokengate_database::DatabasePool;

use crate::output::OutputFormat;

/// Tokengate administration
#[derive(Debug, Parser)]
#[command(name = "tokengate", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (`config/{env}.toml`)
    #[arg(short, long, env = "TOKENGATE_ENV")]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Configuration management
    Config(config::ConfigArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Token record inspection and revocation
    Token(token::TokenArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Config(args) => config::execute(args, self, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, self).await,
            Commands::User(args) => user::execute(args, self, self.format).await,
            Commands::Token(args) => token::execute(args, self, self.format).await,
        }
    }

    /// Load configuration from the selected file and overlay
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load(&self.config, self.env.as_deref())
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}
