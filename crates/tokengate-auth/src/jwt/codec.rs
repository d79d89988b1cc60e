//! Signing and verification behind one handle.

use std::sync::Arc;

use tokengate_core::config::AuthConfig;
use tokengate_core::error::AppError;
use tokengate_core::traits::Clock;
use tokengate_core::types::TokenTtl;

use super::claims::TokenPayload;
use super::decoder::JwtDecoder;
use super::encoder::{JwtEncoder, SignedToken};

/// Signs and verifies compact tokens with the configured secret.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenCodec {
    /// Creates a codec sharing one clock between signing and verification.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoder: JwtEncoder::new(config, Arc::clone(&clock)),
            decoder: JwtDecoder::new(config, clock),
        }
    }

    /// Signs `payload`, expiring `ttl` from now.
    pub fn sign(&self, payload: &TokenPayload, ttl: TokenTtl) -> Result<SignedToken, AppError> {
        self.encoder.sign(payload, ttl)
    }

    /// Verifies signature first, then the embedded expiry.
    pub fn verify(&self, token: &str) -> Result<TokenPayload, AppError> {
        self.decoder.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::TokenKind;
    use chrono::{Duration, Utc};
    use tokengate_core::error::ErrorKind;
    use tokengate_core::traits::ManualClock;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    fn payload(kind: TokenKind) -> TokenPayload {
        TokenPayload {
            subject: "7f1c".to_string(),
            username: "alice".to_string(),
            group: "staff".to_string(),
            kind,
        }
    }

    #[test]
    fn test_sign_then_verify() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let codec = TokenCodec::new(&config("secret"), clock.clone());

        let signed = codec
            .sign(&payload(TokenKind::Access), TokenTtl::minutes(15))
            .unwrap();
        let decoded = codec.verify(&signed.token).unwrap();

        assert_eq!(decoded, payload(TokenKind::Access));
        let expected = clock.now() + Duration::minutes(15);
        assert!((signed.expires_at - expected).num_seconds().abs() <= 1);
    }

    #[test]
    fn test_tokens_are_unique_within_one_second() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let codec = TokenCodec::new(&config("secret"), clock);
        let a = codec.sign(&payload(TokenKind::Access), TokenTtl::minutes(15)).unwrap();
        let b = codec.sign(&payload(TokenKind::Access), TokenTtl::minutes(15)).unwrap();
        assert_ne!(a.token, b.token);
        assert_eq!(a.expires_at, b.expires_at);
    }

    #[test]
    fn test_expired_token_rejected_as_expired() {
        let clock = Arc::new(ManualClock::new(Utc::now() - Duration::hours(1)));
        let codec = TokenCodec::new(&config("secret"), clock.clone());
        let signed = codec
            .sign(&payload(TokenKind::Access), TokenTtl::minutes(15))
            .unwrap();

        clock.advance(Duration::hours(1));
        let err = codec.verify(&signed.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpiredToken);
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let codec = TokenCodec::new(&config("secret"), clock.clone());
        let signed = codec
            .sign(&payload(TokenKind::Access), TokenTtl::minutes(1))
            .unwrap();

        clock.set(signed.expires_at - Duration::seconds(1));
        assert!(codec.verify(&signed.token).is_ok());

        clock.set(signed.expires_at);
        assert_eq!(
            codec.verify(&signed.token).unwrap_err().kind,
            ErrorKind::ExpiredToken
        );
    }

    #[test]
    fn test_overflowing_lifetime_is_an_error_not_a_panic() {
        let clock = Arc::new(ManualClock::default());
        let codec = TokenCodec::new(&config("secret"), clock);
        let err = codec
            .sign(&payload(TokenKind::Access), TokenTtl::hours(u32::MAX))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_wrong_secret_is_malformed() {
        let clock: Arc<ManualClock> = Arc::new(ManualClock::default());
        let signer = TokenCodec::new(&config("secret-a"), clock.clone());
        let verifier = TokenCodec::new(&config("secret-b"), clock);

        let signed = signer
            .sign(&payload(TokenKind::Access), TokenTtl::minutes(15))
            .unwrap();
        let err = verifier.verify(&signed.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedToken);
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let clock = Arc::new(ManualClock::new(Utc::now() - Duration::hours(2)));
        let signer = TokenCodec::new(&config("secret-a"), clock.clone());
        let signed = signer
            .sign(&payload(TokenKind::Access), TokenTtl::minutes(15))
            .unwrap();

        clock.advance(Duration::hours(2));
        let verifier = TokenCodec::new(&config("secret-b"), clock);
        let err = verifier.verify(&signed.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedToken);
    }

    #[test]
    fn test_garbage_and_tampered_tokens_are_malformed() {
        let clock = Arc::new(ManualClock::default());
        let codec = TokenCodec::new(&config("secret"), clock);

        for garbage in ["garbage", "", "a.b.c", "eyJhbGciOiJIUzI1NiJ9..."] {
            let err = codec.verify(garbage).unwrap_err();
            assert_eq!(err.kind, ErrorKind::MalformedToken, "{garbage:?}");
        }

        let signed = codec
            .sign(&payload(TokenKind::Refresh), TokenTtl::hours(1))
            .unwrap();
        let mut tampered = signed.token.clone();
        tampered.pop();
        tampered.push(if signed.token.ends_with('A') { 'B' } else { 'A' });
        let err = codec.verify(&tampered).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedToken);
    }
}
