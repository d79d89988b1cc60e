//! JWT verification.
//!
//! The library's own `exp` check is switched off; expiry is compared against
//! the injected clock so the codec and the token store agree on "now".

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use tokengate_core::config::AuthConfig;
use tokengate_core::error::AppError;
use tokengate_core::traits::Clock;

use super::claims::{Claims, TokenPayload};

/// Validates token signatures and embedded expiry.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Source of "now" for the expiry comparison.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Verifies `token` and returns its payload.
    ///
    /// Checks, in order:
    /// 1. Structure and signature (`MalformedToken`)
    /// 2. Embedded expiry against the clock (`ExpiredToken`)
    pub fn verify(&self, token: &str) -> Result<TokenPayload, AppError> {
        Ok(self.verify_claims(token)?.payload)
    }

    /// Like [`verify`](Self::verify) but returns the full claim set.
    pub fn verify_claims(&self, token: &str) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature => {
                    AppError::malformed_token("Invalid token signature")
                }
                JwtErrorKind::InvalidToken | JwtErrorKind::Base64(_) => {
                    AppError::malformed_token("Invalid token format")
                }
                _ => AppError::malformed_token(format!("Token validation failed: {e}")),
            })?
            .claims;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AppError::expired_token("Token has expired"));
        }

        Ok(claims)
    }
}
