//! Axum middleware stack.

pub mod auth;
pub mod logging;
pub mod refresh;
