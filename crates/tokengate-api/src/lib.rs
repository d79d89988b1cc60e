//! # tokengate-api
//!
//! HTTP API layer for Tokengate built on Axum.
//!
//! Provides the auth endpoints, the `require_auth` and `transparent_refresh`
//! middleware, the `AuthUser` extractor, DTOs, and error mapping.

pub mod cookie;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
