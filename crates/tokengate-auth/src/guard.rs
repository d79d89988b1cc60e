//! Per-request bearer token validation.
//!
//! ```text
//! NoToken ──header──▶ Parsed ──verify──▶ Verified ──kind──▶ Authorized
//!    │                  │                  │
//!    └──────────────────┴──────────────────┴──▶ Rejected(reason)
//! ```
//!
//! The guard is pure CPU work: it never awaits and never reads the token
//! store.

use tokengate_core::error::AppError;
use tokengate_core::result::AppResult;

use crate::jwt::{TokenCodec, TokenKind, TokenPayload};

/// Validates the `Authorization` header of a protected request.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    codec: TokenCodec,
}

impl AccessGuard {
    /// Creates a guard verifying with `codec`.
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    /// Returns the caller identity if `header` carries a valid access token.
    ///
    /// - no header: `MissingToken`
    /// - not `Bearer <token>`, or a token that fails verification: `MalformedToken`
    /// - past its embedded expiry: `ExpiredToken`
    /// - a refresh token: `WrongTokenType`
    pub fn authorize(&self, header: Option<&str>) -> AppResult<TokenPayload> {
        self.authorize_bearer(header).map(|(payload, _)| payload)
    }

    /// Like [`authorize`](Self::authorize), but also hands back the raw
    /// token so callers can compare it against the stored one.
    pub fn authorize_bearer<'h>(
        &self,
        header: Option<&'h str>,
    ) -> AppResult<(TokenPayload, &'h str)> {
        let header =
            header.ok_or_else(|| AppError::missing_token("Missing Authorization header"))?;
        let token = parse_bearer(header)?;
        let payload = self.codec.verify(token)?;

        match payload.kind {
            TokenKind::Access => Ok((payload, token)),
            TokenKind::Refresh => Err(AppError::wrong_token_type(
                "Refresh tokens cannot authorize requests",
            )),
        }
    }
}

/// Splits `Bearer <token>` into its token. Exactly two space-separated parts
/// are accepted and the scheme is case-sensitive.
fn parse_bearer(header: &str) -> AppResult<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AppError::malformed_token(
            "Authorization header must be 'Bearer <token>'",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;
    use chrono::Duration;
    use tokengate_core::error::ErrorKind;
    use tokengate_core::traits::Clock;
    use tokengate_core::types::TokenTtl;

    #[tokio::test]
    async fn test_access_token_is_authorized() {
        let fx = fixture();
        let guard = AccessGuard::new(fx.issuer.codec().clone());
        let pair = fx.issuer.login("alice", "secret").await.unwrap();

        let payload = guard
            .authorize(Some(&format!("Bearer {}", pair.access.token)))
            .unwrap();
        assert_eq!(payload.username, "alice");
        assert_eq!(payload.kind, TokenKind::Access);
    }

    #[tokio::test]
    async fn test_refresh_token_is_wrong_type() {
        let fx = fixture();
        let guard = AccessGuard::new(fx.issuer.codec().clone());
        let pair = fx.issuer.login("alice", "secret").await.unwrap();

        let err = guard
            .authorize(Some(&format!("Bearer {}", pair.refresh.token)))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::WrongTokenType);
    }

    #[test]
    fn test_missing_header() {
        let fx = fixture();
        let guard = AccessGuard::new(fx.issuer.codec().clone());
        assert_eq!(guard.authorize(None).unwrap_err().kind, ErrorKind::MissingToken);
    }

    #[test]
    fn test_bearer_garbage_is_malformed() {
        let fx = fixture();
        let guard = AccessGuard::new(fx.issuer.codec().clone());
        let err = guard.authorize(Some("Bearer garbage")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedToken);
    }

    #[tokio::test]
    async fn test_header_shape_is_strict() {
        let fx = fixture();
        let guard = AccessGuard::new(fx.issuer.codec().clone());
        let pair = fx.issuer.login("alice", "secret").await.unwrap();
        let token = &pair.access.token;

        for header in [
            String::new(),
            "Bearer".to_string(),
            "Bearer ".to_string(),
            token.clone(),
            format!("bearer {token}"),
            format!("Token {token}"),
            format!("Bearer  {token}"),
            format!("Bearer {token} extra"),
        ] {
            let err = guard.authorize(Some(&header)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::MalformedToken, "{header:?}");
        }
    }

    #[test]
    fn test_token_signed_an_hour_ago_is_expired() {
        let fx = fixture();
        let guard = AccessGuard::new(fx.issuer.codec().clone());

        let now = fx.clock.now();
        fx.clock.set(now - Duration::hours(1));
        let payload = TokenPayload {
            subject: "s".to_string(),
            username: "alice".to_string(),
            group: "staff".to_string(),
            kind: TokenKind::Access,
        };
        let signed = fx.issuer.codec().sign(&payload, TokenTtl::minutes(15)).unwrap();
        fx.clock.set(now);

        let err = guard
            .authorize(Some(&format!("Bearer {}", signed.token)))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpiredToken);
    }
}
