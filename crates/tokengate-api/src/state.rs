//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use tokengate_auth::{AccessGuard, RefreshRotator, TokenIssuer};
use tokengate_core::config::AppConfig;
use tokengate_database::DatabasePool;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Login, rotation, logout
    pub issuer: Arc<TokenIssuer>,
    /// Bearer validation for protected routes
    pub guard: Arc<AccessGuard>,
    /// Post-handler access-token rotation
    pub rotator: Arc<RefreshRotator>,
    /// PostgreSQL pool, absent when running on in-memory stores
    pub database: Option<DatabasePool>,
}

impl AppState {
    /// Builds the state around an issuer. The guard and rotator share the
    /// issuer's codec and store.
    pub fn new(
        config: Arc<AppConfig>,
        issuer: Arc<TokenIssuer>,
        database: Option<DatabasePool>,
    ) -> Self {
        let guard = Arc::new(AccessGuard::new(issuer.codec().clone()));
        let rotator = Arc::new(RefreshRotator::new(Arc::clone(&issuer)));
        Self {
            config,
            issuer,
            guard,
            rotator,
            database,
        }
    }
}
