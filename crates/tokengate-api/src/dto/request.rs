//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, max = 255, message = "Username is required"))]
    pub username: String,
    /// Password. Compared as given, never trimmed.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Explicit token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Username the refresh token was issued to.
    #[validate(length(min = 1, max = 255, message = "Username is required"))]
    pub username: String,
    /// Refresh token from the login response.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}
