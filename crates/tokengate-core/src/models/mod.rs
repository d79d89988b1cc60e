//! Persisted models shared by the store implementations and the auth core.

pub mod audit;
pub mod token;
pub mod user;

pub use audit::{AuditEntry, AuditLevel};
pub use token::{StoredToken, TokenFields, TokenRecord};
pub use user::Identity;
