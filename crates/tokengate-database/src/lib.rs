//! # tokengate-database
//!
//! PostgreSQL connection management and the repositories backing the
//! `UserDirectory`, `TokenStore`, and `AuditLog` traits.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{AuditLogRepository, TokenRepository, UserRepository};
