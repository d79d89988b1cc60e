//! Tokengate server.
//!
//! Main entry point that wires the crates together and starts the HTTP server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use tokengate_api::{AppState, build_router};
use tokengate_auth::{CredentialVerifier, PasswordHasher, TokenIssuer, TracingAuditLog};
use tokengate_core::config::AppConfig;
use tokengate_core::error::AppError;
use tokengate_core::traits::{AuditLog, SystemClock};
use tokengate_database::migration::run_migrations;
use tokengate_database::{AuditLogRepository, DatabasePool, TokenRepository, UserRepository};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay, and variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("TOKENGATE_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("TOKENGATE_ENV").ok();

    AppConfig::load(&config_path, env.as_deref())
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Tokengate");

    // Warnings from the first validation predate the subscriber.
    config.validate()?;

    let db_pool = DatabasePool::connect(&config.database).await?;
    run_migrations(db_pool.pool()).await?;

    let users = Arc::new(UserRepository::new(db_pool.pool().clone()));
    let tokens = Arc::new(TokenRepository::new(db_pool.pool().clone()));
    let audit: Arc<dyn AuditLog> = if config.auth.audit_enabled {
        Arc::new(AuditLogRepository::new(db_pool.pool().clone()))
    } else {
        Arc::new(TracingAuditLog)
    };

    let verifier = CredentialVerifier::new(users, Arc::new(PasswordHasher::new()))?;
    let issuer = TokenIssuer::new(
        &config.auth,
        verifier,
        tokens,
        audit,
        Arc::new(SystemClock),
    );
    tracing::info!(
        access_ttl = %config.auth.access_token_ttl,
        refresh_ttl = %config.auth.refresh_token_ttl,
        audit_enabled = config.auth.audit_enabled,
        session_policy = ?config.auth.session_policy,
        "Token issuer ready"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = AppState::new(Arc::new(config), Arc::new(issuer), Some(db_pool.clone()));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!(addr = %addr, "Tokengate listening");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, draining connections");
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    let result = tokio::select! {
        result = server => result.map_err(|e| AppError::internal(format!("Server error: {e}"))),
        _ = grace_elapsed(shutdown_rx, grace) => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Shutdown grace period elapsed");
            Ok(())
        }
    };

    db_pool.close().await;
    tracing::info!("Tokengate stopped");
    result
}

/// Resolves `grace` after shutdown has begun.
async fn grace_elapsed(mut shutdown: watch::Receiver<bool>, grace: Duration) {
    if shutdown.wait_for(|started| *started).await.is_err() {
        std::future::pending::<()>().await;
    }
    tokio::time::sleep(grace).await;
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
