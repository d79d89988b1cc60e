//! Payload embedded in every access and refresh token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tokengate_core::models::Identity;

/// Distinguishes access tokens from refresh tokens.
///
/// Both kinds are signed with the same secret, so this tag is the only thing
/// keeping a refresh token from opening a protected route.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token for protected operations.
    Access,
    /// Long-lived token used only to mint new access tokens.
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// The caller identity carried by a token.
///
/// Wire shape: `{"sub": .., "username": .., "group": .., "type": "access"|"refresh"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Subject identifier.
    #[serde(rename = "sub")]
    pub subject: String,
    /// Login name; also the token store key.
    pub username: String,
    /// Group of the principal.
    pub group: String,
    /// Access or refresh.
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

impl TokenPayload {
    /// Builds a payload of the given kind for an authenticated identity.
    pub fn for_identity(identity: &Identity, kind: TokenKind) -> Self {
        Self {
            subject: identity.subject_id.to_string(),
            username: identity.username.clone(),
            group: identity.group_id.clone(),
            kind,
        }
    }

    /// Same principal, different kind.
    pub fn with_kind(&self, kind: TokenKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }
}

/// Full JWT claim set: the payload plus registered claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Caller identity.
    #[serde(flatten)]
    pub payload: TokenPayload,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    /// Unique token ID; keeps two tokens minted in the same second distinct.
    pub jti: Uuid,
}
