//! Token issuance: login, access-token rotation, and logout.
//!
//! The issuer is the only component that writes the token record. Every
//! write is a single [`TokenStore::upsert`] or [`TokenStore::delete`], so the
//! record is never torn even if the calling request is dropped mid-flight.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use tokengate_core::config::{AuthConfig, SessionPolicy};
use tokengate_core::error::{AppError, ErrorKind};
use tokengate_core::models::{AuditLevel, TokenFields};
use tokengate_core::result::AppResult;
use tokengate_core::traits::{AuditLog, Clock, TokenStore};
use tokengate_core::types::TokenTtl;

use crate::credential::CredentialVerifier;
use crate::jwt::{SignedToken, TokenCodec, TokenKind, TokenPayload};

/// The access/refresh pair handed out at login.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IssuedPair {
    /// Short-lived token for protected operations.
    pub access: SignedToken,
    /// Long-lived token for minting new access tokens.
    pub refresh: SignedToken,
    /// The principal both tokens were issued to.
    pub payload: TokenPayload,
}

/// Mints, persists, rotates, and revokes tokens.
pub struct TokenIssuer {
    verifier: CredentialVerifier,
    codec: TokenCodec,
    store: Arc<dyn TokenStore>,
    audit: Arc<dyn AuditLog>,
    clock: Arc<dyn Clock>,
    access_ttl: TokenTtl,
    refresh_ttl: TokenTtl,
    session_policy: SessionPolicy,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("session_policy", &self.session_policy)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Creates an issuer. The codec is built from `config` and shares `clock`
    /// with the expiry checks done here.
    pub fn new(
        config: &AuthConfig,
        verifier: CredentialVerifier,
        store: Arc<dyn TokenStore>,
        audit: Arc<dyn AuditLog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            verifier,
            codec: TokenCodec::new(config, Arc::clone(&clock)),
            store,
            audit,
            clock,
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
            session_policy: config.session_policy,
        }
    }

    /// The codec used for signing, shared with the access guard.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Configured access-token lifetime.
    pub fn access_ttl(&self) -> TokenTtl {
        self.access_ttl
    }

    /// Authenticates and issues a fresh token pair, replacing any previous
    /// session for the user.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<IssuedPair> {
        let identity = match self.verifier.authenticate(username, password).await {
            Ok(identity) => identity,
            Err(e) => {
                if e.kind == ErrorKind::InvalidCredentials {
                    self.audit
                        .record(AuditLevel::Warn, "Login rejected", json!({ "username": username }))
                        .await;
                }
                return Err(e);
            }
        };

        let payload = TokenPayload::for_identity(&identity, TokenKind::Access);
        let access = self.codec.sign(&payload, self.access_ttl)?;
        let refresh = self
            .codec
            .sign(&payload.with_kind(TokenKind::Refresh), self.refresh_ttl)?;

        self.store
            .upsert(
                &identity.username,
                TokenFields {
                    access: Some(access.to_stored()),
                    refresh: Some(refresh.to_stored()),
                    group_id: Some(identity.group_id.clone()),
                },
            )
            .await
            .map_err(storage_failure)?;

        info!(username = %identity.username, "User logged in");
        self.audit
            .record(
                AuditLevel::Info,
                "Login succeeded",
                json!({ "username": identity.username, "group": identity.group_id }),
            )
            .await;

        Ok(IssuedPair {
            access,
            refresh,
            payload,
        })
    }

    /// Mints a new access token from `presented_refresh`.
    ///
    /// The refresh token must verify, be of kind `refresh`, belong to
    /// `username`, equal the stored refresh token, and not be past its stored
    /// expiry. Every one of those failures is reported as `InvalidRefresh`.
    pub async fn rotate_access(
        &self,
        username: &str,
        presented_refresh: &str,
    ) -> AppResult<SignedToken> {
        let result = self.try_rotate(username, presented_refresh).await;

        if let Err(e) = &result {
            if e.kind == ErrorKind::InvalidRefresh {
                self.audit
                    .record(
                        AuditLevel::Warn,
                        "Refresh rejected",
                        json!({ "username": username, "reason": e.message }),
                    )
                    .await;
            }
        }

        result
    }

    async fn try_rotate(&self, username: &str, presented: &str) -> AppResult<SignedToken> {
        let payload = self
            .codec
            .verify(presented)
            .map_err(|e| AppError::invalid_refresh(format!("Refresh token rejected: {}", e.message)))?;

        match payload.kind {
            TokenKind::Refresh => {}
            TokenKind::Access => {
                return Err(AppError::invalid_refresh("Token is not a refresh token"));
            }
        }

        if payload.username != username {
            return Err(AppError::invalid_refresh(
                "Refresh token belongs to a different user",
            ));
        }

        let stored = self
            .store
            .find(username)
            .await
            .map_err(storage_failure)?
            .and_then(|record| record.refresh())
            .ok_or_else(|| AppError::invalid_refresh("No active session"))?;

        if stored.token != presented {
            return Err(AppError::invalid_refresh(
                "Refresh token has been superseded",
            ));
        }

        if stored.is_expired_at(self.clock.now()) {
            return Err(AppError::invalid_refresh("Refresh token has expired"));
        }

        let access = self
            .codec
            .sign(&payload.with_kind(TokenKind::Access), self.access_ttl)?;

        self.store
            .upsert(username, TokenFields::access_only(access.to_stored()))
            .await
            .map_err(storage_failure)?;

        debug!(username = %username, expires_at = %access.expires_at, "Access token rotated");
        Ok(access)
    }

    /// Ends the session for `username` by deleting its token record.
    pub async fn logout(&self, username: &str) -> AppResult<()> {
        let existed = self.store.delete(username).await.map_err(storage_failure)?;
        if !existed {
            return Err(AppError::token_not_found("No active session"));
        }

        info!(username = %username, "User logged out");
        self.audit
            .record(AuditLevel::Info, "Logout", json!({ "username": username }))
            .await;
        Ok(())
    }

    /// Checks that `presented_access` still belongs to the principal's
    /// active session.
    ///
    /// A missing record always fails, so logout and revoke take effect on
    /// the next request. Under [`SessionPolicy::ExactMatch`] the token must
    /// also equal the stored access token and be within its stored expiry.
    pub async fn ensure_active_session(
        &self,
        payload: &TokenPayload,
        presented_access: &str,
    ) -> AppResult<()> {
        let record = self
            .store
            .find(&payload.username)
            .await
            .map_err(storage_failure)?
            .ok_or_else(|| AppError::token_not_found("Session has ended"))?;

        match self.session_policy {
            SessionPolicy::ActiveRecord => Ok(()),
            SessionPolicy::ExactMatch => {
                let stored = record
                    .access()
                    .ok_or_else(|| AppError::token_not_found("No access token on record"))?;
                if stored.token != presented_access {
                    return Err(AppError::token_not_found(
                        "Access token has been superseded",
                    ));
                }
                if stored.is_expired_at(self.clock.now()) {
                    return Err(AppError::expired_token("Access token has expired"));
                }
                Ok(())
            }
        }
    }

    /// The currently stored refresh token for `username`, if any.
    pub async fn stored_refresh(&self, username: &str) -> AppResult<Option<String>> {
        Ok(self
            .store
            .find(username)
            .await
            .map_err(storage_failure)?
            .and_then(|record| record.refresh_token))
    }
}

/// Maps a store error to `Storage`, keeping it as is when already so.
fn storage_failure(err: AppError) -> AppError {
    match err.kind {
        ErrorKind::Storage => err,
        _ => AppError::with_source(ErrorKind::Storage, "Token store failure", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingTokenStore, fixture, fixture_with_policy, issuer_with_store};
    use chrono::Duration;
    use tokengate_core::models::StoredToken;

    #[tokio::test]
    async fn test_login_issues_decodable_pair() {
        let fx = fixture();
        let started = fx.clock.now();

        let pair = fx.issuer.login("alice", "secret").await.unwrap();

        let access = fx.issuer.codec().verify(&pair.access.token).unwrap();
        let refresh = fx.issuer.codec().verify(&pair.refresh.token).unwrap();
        assert_eq!(access.username, "alice");
        assert_eq!(access.kind, TokenKind::Access);
        assert_eq!(refresh.username, "alice");
        assert_eq!(refresh.kind, TokenKind::Refresh);
        assert_eq!(access.group, "staff");

        let expected = started + Duration::minutes(15);
        assert!((pair.access.expires_at - expected).num_seconds().abs() <= 1);
        let expected = started + Duration::hours(24);
        assert!((pair.refresh.expires_at - expected).num_seconds().abs() <= 1);
    }

    #[tokio::test]
    async fn test_login_persists_authoritative_expiries() {
        let fx = fixture();
        let pair = fx.issuer.login("alice", "secret").await.unwrap();

        let record = fx.store.find("alice").await.unwrap().unwrap();
        assert_eq!(record.access_token.as_deref(), Some(pair.access.token.as_str()));
        assert_eq!(record.refresh_token.as_deref(), Some(pair.refresh.token.as_str()));
        assert_eq!(record.expires_at_access, Some(pair.access.expires_at));
        assert_eq!(record.expires_at_refresh, Some(pair.refresh.expires_at));
        assert_eq!(record.group_id.as_deref(), Some("staff"));
    }

    #[tokio::test]
    async fn test_second_login_overwrites_first() {
        let fx = fixture();
        let first = fx.issuer.login("alice", "secret").await.unwrap();
        let second = fx.issuer.login("alice", "secret").await.unwrap();

        assert_eq!(fx.store.len(), 1);
        let record = fx.store.find("alice").await.unwrap().unwrap();
        assert_eq!(record.refresh_token.as_deref(), Some(second.refresh.token.as_str()));
        assert_ne!(first.refresh.token, second.refresh.token);
    }

    #[tokio::test]
    async fn test_bad_login_is_generic_and_audited() {
        let fx = fixture();
        let wrong = fx.issuer.login("alice", "nope").await.unwrap_err();
        let unknown = fx.issuer.login("nobody", "secret").await.unwrap_err();

        assert_eq!(wrong.kind, ErrorKind::InvalidCredentials);
        assert_eq!(wrong.message, unknown.message);
        assert!(fx.store.is_empty());
        assert_eq!(fx.audit.messages(), vec!["Login rejected", "Login rejected"]);
    }

    #[tokio::test]
    async fn test_rotate_access_updates_only_access_half() {
        let fx = fixture();
        let pair = fx.issuer.login("alice", "secret").await.unwrap();
        fx.clock.advance(Duration::minutes(5));

        let rotated = fx
            .issuer
            .rotate_access("alice", &pair.refresh.token)
            .await
            .unwrap();

        let record = fx.store.find("alice").await.unwrap().unwrap();
        assert_eq!(record.access_token.as_deref(), Some(rotated.token.as_str()));
        assert_eq!(record.expires_at_access, Some(rotated.expires_at));
        assert_eq!(record.refresh_token.as_deref(), Some(pair.refresh.token.as_str()));
        assert!(rotated.expires_at > pair.access.expires_at);

        let payload = fx.issuer.codec().verify(&rotated.token).unwrap();
        assert_eq!(payload.kind, TokenKind::Access);
        assert_eq!(payload.username, "alice");
    }

    #[tokio::test]
    async fn test_rotate_with_superseded_session_refresh_is_rejected() {
        let fx = fixture();
        let session_a = fx.issuer.login("alice", "secret").await.unwrap();
        let _session_b = fx.issuer.login("alice", "secret").await.unwrap();

        let err = fx
            .issuer
            .rotate_access("alice", &session_a.refresh.token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRefresh);
        assert_eq!(fx.audit.messages().last().map(String::as_str), Some("Refresh rejected"));
    }

    #[tokio::test]
    async fn test_rotate_with_other_users_refresh_is_rejected() {
        let fx = fixture();
        let _alice = fx.issuer.login("alice", "secret").await.unwrap();
        let bob = fx.issuer.login("bob", "hunter2").await.unwrap();

        let err = fx
            .issuer
            .rotate_access("alice", &bob.refresh.token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRefresh);
    }

    #[tokio::test]
    async fn test_stored_refresh_expiry_is_authoritative() {
        let fx = fixture();
        let pair = fx.issuer.login("alice", "secret").await.unwrap();

        // Same token, but the stored expiry is already behind us while the
        // embedded claim still has ~24h left.
        fx.store
            .upsert(
                "alice",
                TokenFields {
                    refresh: Some(StoredToken {
                        token: pair.refresh.token.clone(),
                        expires_at: fx.clock.now(),
                    }),
                    ..TokenFields::default()
                },
            )
            .await
            .unwrap();

        assert!(fx.issuer.codec().verify(&pair.refresh.token).is_ok());
        let err = fx
            .issuer
            .rotate_access("alice", &pair.refresh.token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRefresh);
    }

    #[tokio::test]
    async fn test_rotate_after_refresh_lifetime_is_rejected() {
        let fx = fixture();
        let pair = fx.issuer.login("alice", "secret").await.unwrap();
        fx.clock.advance(Duration::hours(24));

        let err = fx
            .issuer
            .rotate_access("alice", &pair.refresh.token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRefresh);
    }

    #[tokio::test]
    async fn test_rotate_with_access_token_or_garbage_is_invalid_refresh() {
        let fx = fixture();
        let pair = fx.issuer.login("alice", "secret").await.unwrap();

        for presented in [pair.access.token.as_str(), "garbage"] {
            let err = fx.issuer.rotate_access("alice", presented).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidRefresh);
        }
    }

    #[tokio::test]
    async fn test_logout_removes_record() {
        let fx = fixture();
        let pair = fx.issuer.login("alice", "secret").await.unwrap();
        fx.issuer
            .ensure_active_session(&pair.payload, &pair.access.token)
            .await
            .unwrap();

        fx.issuer.logout("alice").await.unwrap();

        assert!(fx.store.find("alice").await.unwrap().is_none());
        let err = fx
            .issuer
            .ensure_active_session(&pair.payload, &pair.access.token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenNotFound);
        let err = fx.issuer.logout("alice").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenNotFound);
        let err = fx
            .issuer
            .rotate_access("alice", &pair.refresh.token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRefresh);
    }

    #[tokio::test]
    async fn test_active_record_policy_accepts_superseded_access() {
        let fx = fixture_with_policy(SessionPolicy::ActiveRecord);
        let pair = fx.issuer.login("alice", "secret").await.unwrap();
        fx.issuer
            .rotate_access("alice", &pair.refresh.token)
            .await
            .unwrap();

        fx.issuer
            .ensure_active_session(&pair.payload, &pair.access.token)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_second_login_ends_first_session() {
        let fx = fixture();
        let first = fx.issuer.login("alice", "secret").await.unwrap();
        let second = fx.issuer.login("alice", "secret").await.unwrap();

        let err = fx
            .issuer
            .ensure_active_session(&first.payload, &first.access.token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenNotFound);
        fx.issuer
            .ensure_active_session(&second.payload, &second.access.token)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_exact_match_policy_accepts_only_latest_access() {
        let fx = fixture();
        let pair = fx.issuer.login("alice", "secret").await.unwrap();
        fx.issuer
            .ensure_active_session(&pair.payload, &pair.access.token)
            .await
            .unwrap();

        let rotated = fx
            .issuer
            .rotate_access("alice", &pair.refresh.token)
            .await
            .unwrap();

        let err = fx
            .issuer
            .ensure_active_session(&pair.payload, &pair.access.token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenNotFound);
        fx.issuer
            .ensure_active_session(&pair.payload, &rotated.token)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_exact_match_policy_honours_stored_access_expiry() {
        let fx = fixture();
        let pair = fx.issuer.login("alice", "secret").await.unwrap();
        fx.store
            .upsert(
                "alice",
                TokenFields::access_only(StoredToken {
                    token: pair.access.token.clone(),
                    expires_at: fx.clock.now(),
                }),
            )
            .await
            .unwrap();

        let err = fx
            .issuer
            .ensure_active_session(&pair.payload, &pair.access.token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpiredToken);
    }

    #[tokio::test]
    async fn test_store_failures_surface_as_storage() {
        let issuer = issuer_with_store(Arc::new(FailingTokenStore));

        let err = issuer.login("alice", "secret").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);

        let err = issuer.logout("alice").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);

        let err = issuer.stored_refresh("alice").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);
    }
}
