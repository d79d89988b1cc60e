//! Shared fixtures for the unit tests in this crate.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use tokengate_core::config::{AuthConfig, SessionPolicy};
use tokengate_core::error::AppError;
use tokengate_core::models::{Identity, TokenFields, TokenRecord};
use tokengate_core::result::AppResult;
use tokengate_core::traits::{ManualClock, TokenStore};

use crate::audit::MemoryAuditLog;
use crate::credential::CredentialVerifier;
use crate::directory::MemoryUserDirectory;
use crate::issuer::TokenIssuer;
use crate::password::PasswordHasher;
use crate::store::MemoryTokenStore;

pub(crate) struct Fixture {
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryTokenStore>,
    pub audit: MemoryAuditLog,
    pub issuer: Arc<TokenIssuer>,
}

pub(crate) fn auth_config(session_policy: SessionPolicy) -> AuthConfig {
    AuthConfig {
        jwt_secret: "unit-test-secret".to_string(),
        session_policy,
        ..AuthConfig::default()
    }
}

/// Directory holding `alice/secret` (group `staff`) and `bob/hunter2`
/// (group `admin`).
pub(crate) fn directory(hasher: &PasswordHasher) -> MemoryUserDirectory {
    let directory = MemoryUserDirectory::new();
    for (username, password, group) in [("alice", "secret", "staff"), ("bob", "hunter2", "admin")] {
        directory.insert(Identity {
            subject_id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: hasher.hash_password(password).unwrap(),
            group_id: group.to_string(),
        });
    }
    directory
}

fn build_issuer(
    policy: SessionPolicy,
    store: Arc<dyn TokenStore>,
    audit: MemoryAuditLog,
    clock: Arc<ManualClock>,
) -> TokenIssuer {
    let hasher = Arc::new(PasswordHasher::insecure_fast());
    let verifier = CredentialVerifier::new(Arc::new(directory(&hasher)), hasher).unwrap();
    TokenIssuer::new(&auth_config(policy), verifier, store, Arc::new(audit), clock)
}

pub(crate) fn fixture() -> Fixture {
    fixture_with_policy(SessionPolicy::default())
}

pub(crate) fn fixture_with_policy(policy: SessionPolicy) -> Fixture {
    let clock = Arc::new(ManualClock::default());
    let store = Arc::new(MemoryTokenStore::new(clock.clone()));
    let audit = MemoryAuditLog::new();
    let issuer = build_issuer(policy, store.clone(), audit.clone(), clock.clone());
    Fixture {
        clock,
        store,
        audit,
        issuer: Arc::new(issuer),
    }
}

pub(crate) fn issuer_with_store(store: Arc<dyn TokenStore>) -> TokenIssuer {
    build_issuer(
        SessionPolicy::default(),
        store,
        MemoryAuditLog::new(),
        Arc::new(ManualClock::default()),
    )
}

/// A store whose every call fails.
pub(crate) struct FailingTokenStore;

#[async_trait]
impl TokenStore for FailingTokenStore {
    async fn upsert(&self, _username: &str, _fields: TokenFields) -> AppResult<TokenRecord> {
        Err(AppError::storage("connection refused"))
    }

    async fn find(&self, _username: &str) -> AppResult<Option<TokenRecord>> {
        Err(AppError::storage("connection refused"))
    }

    async fn delete(&self, _username: &str) -> AppResult<bool> {
        Err(AppError::storage("connection refused"))
    }
}
