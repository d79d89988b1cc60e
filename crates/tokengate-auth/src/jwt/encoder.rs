//! JWT creation with an expiry computed from the injected clock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use tokengate_core::config::AuthConfig;
use tokengate_core::error::AppError;
use tokengate_core::models::StoredToken;
use tokengate_core::traits::Clock;
use tokengate_core::types::TokenTtl;

use super::claims::{Claims, TokenPayload};

/// A freshly signed token and the expiry instant embedded in it.
///
/// `expires_at` is the value callers persist as the authoritative expiry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignedToken {
    /// Compact JWS.
    pub token: String,
    /// Expiry instant, truncated to whole seconds to match the `exp` claim.
    pub expires_at: DateTime<Utc>,
}

impl SignedToken {
    /// Converts into the store's token-plus-expiry field.
    pub fn to_stored(&self) -> StoredToken {
        StoredToken {
            token: self.token.clone(),
            expires_at: self.expires_at,
        }
    }
}

/// Signs token payloads with HMAC-SHA256.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Source of `iat` and `exp`.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            clock,
        }
    }

    /// Signs `payload` with an expiry of `now + ttl`.
    pub fn sign(&self, payload: &TokenPayload, ttl: TokenTtl) -> Result<SignedToken, AppError> {
        let now = self.clock.now();
        let exp = now
            .checked_add_signed(ttl.as_duration())
            .ok_or_else(|| {
                AppError::configuration(format!("Token lifetime {ttl} overflows the expiry"))
            })?
            .timestamp();
        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| AppError::internal("Token expiry out of range"))?;

        let claims = Claims {
            payload: payload.clone(),
            iat: now.timestamp(),
            exp,
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::internal(format!("Failed to encode {} token: {e}", payload.kind))
        })?;

        Ok(SignedToken { token, expires_at })
    }
}
