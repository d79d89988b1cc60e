//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tokengate_auth::{IssuedPair, SignedToken, TokenPayload};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
    /// The authenticated principal.
    pub user: IdentityResponse,
}

impl From<IssuedPair> for LoginResponse {
    fn from(pair: IssuedPair) -> Self {
        Self {
            access_token: pair.access.token,
            refresh_token: pair.refresh.token,
            access_expires_at: pair.access.expires_at,
            refresh_expires_at: pair.refresh.expires_at,
            user: IdentityResponse::from(&pair.payload),
        }
    }
}

/// Explicit refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
}

impl From<SignedToken> for RefreshResponse {
    fn from(token: SignedToken) -> Self {
        Self {
            access_token: token.token,
            access_expires_at: token.expires_at,
        }
    }
}

/// Caller identity as carried in the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityResponse {
    /// Subject identifier.
    pub subject: String,
    /// Username.
    pub username: String,
    /// Group.
    pub group: String,
}

impl From<&TokenPayload> for IdentityResponse {
    fn from(payload: &TokenPayload) -> Self {
        Self {
            subject: payload.subject.clone(),
            username: payload.username.clone(),
            group: payload.group.clone(),
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// `"connected"`, `"unreachable"`, or `"not configured"`.
    pub database: String,
}
