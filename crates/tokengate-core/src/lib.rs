//! # tokengate-core
//!
//! Core crate for Tokengate. Contains the collaborator traits (clock, user
//! directory, token store, audit log), configuration schemas, persisted
//! models, the TTL grammar, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Tokengate crates.

pub mod config;
pub mod error;
pub mod models;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
