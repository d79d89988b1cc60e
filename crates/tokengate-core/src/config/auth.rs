//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::types::TokenTtl;

/// Placeholder shipped in `config/default.toml`; startup warns when it is
/// still in use.
pub const PLACEHOLDER_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Token signing and lifetime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256). Shared by access and
    /// refresh tokens.
    #[serde(default = "default_jwt_secret", skip_serializing)]
    pub jwt_secret: String,
    /// Access token lifetime, e.g. `15m`.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl: TokenTtl,
    /// Refresh token lifetime, e.g. `24h`.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl: TokenTtl,
    /// `Path` attribute of the refreshed access-token cookie.
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,
    /// Whether authentication events are written to the audit log.
    #[serde(default = "default_true")]
    pub audit_enabled: bool,
    /// How strictly a presented access token must match the stored session.
    #[serde(default)]
    pub session_policy: SessionPolicy,
}

/// Which access tokens count as belonging to the active session.
///
/// Refresh tokens are always checked against the stored value; this only
/// governs access tokens on protected requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPolicy {
    /// Only the most recently issued access token is accepted, and only
    /// until its stored expiry. A second login ends the first session, and
    /// clients must switch to the refreshed token after every protected
    /// request.
    #[default]
    ExactMatch,
    /// Any unexpired access token of the principal is accepted while a token
    /// record exists. Tokens superseded by a later login or by transparent
    /// refresh stay usable until their own expiry; logout and revoke still
    /// end them at once.
    ActiveRecord,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_token_ttl: default_access_ttl(),
            refresh_token_ttl: default_refresh_ttl(),
            cookie_path: default_cookie_path(),
            audit_enabled: true,
            session_policy: SessionPolicy::default(),
        }
    }
}

fn default_jwt_secret() -> String {
    PLACEHOLDER_SECRET.to_string()
}

fn default_access_ttl() -> TokenTtl {
    TokenTtl::minutes(15)
}

fn default_refresh_ttl() -> TokenTtl {
    TokenTtl::hours(24)
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}
