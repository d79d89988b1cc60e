//! Username/password verification against the user directory.

use std::sync::Arc;

use tracing::{debug, warn};

use tokengate_core::error::{AppError, ErrorKind};
use tokengate_core::models::Identity;
use tokengate_core::traits::UserDirectory;

use crate::password::PasswordHasher;

/// Password compared against when the username is unknown, so that both
/// failure paths pay for one Argon2 verification.
const DUMMY_PASSWORD: &str = "tokengate-dummy-credential";

/// Checks a presented username/password pair.
#[derive(Clone)]
pub struct CredentialVerifier {
    directory: Arc<dyn UserDirectory>,
    hasher: Arc<PasswordHasher>,
    /// PHC string of [`DUMMY_PASSWORD`].
    dummy_hash: Arc<str>,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

impl CredentialVerifier {
    /// Creates a verifier. Hashes the dummy credential once up front.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        hasher: Arc<PasswordHasher>,
    ) -> Result<Self, AppError> {
        let dummy_hash = hasher.hash_password(DUMMY_PASSWORD)?;
        Ok(Self {
            directory,
            hasher,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    /// Returns the identity for `username` if `password` matches its stored
    /// hash.
    ///
    /// Unknown user and wrong password both yield the same
    /// `InvalidCredentials` error. Directory failures yield `Storage`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AppError> {
        let identity = self
            .directory
            .find_by_username(username)
            .await
            .map_err(|e| match e.kind {
                ErrorKind::Storage => e,
                _ => AppError::with_source(ErrorKind::Storage, "User lookup failed", e),
            })?;

        let stored_hash: Arc<str> = match &identity {
            Some(identity) => Arc::from(identity.password_hash.as_str()),
            None => Arc::clone(&self.dummy_hash),
        };

        let matches = self.verify_blocking(password, stored_hash).await?;

        match identity {
            Some(identity) if matches => Ok(identity),
            Some(_) => {
                debug!(username = %username, "Password mismatch");
                Err(AppError::invalid_credentials())
            }
            None => {
                debug!(username = %username, "Unknown username");
                Err(AppError::invalid_credentials())
            }
        }
    }

    /// Runs the Argon2 comparison off the async executor.
    async fn verify_blocking(&self, password: &str, hash: Arc<str>) -> Result<bool, AppError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();

        let outcome = tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?;

        match outcome {
            Ok(matches) => Ok(matches),
            Err(e) => {
                warn!(error = %e, "Stored credential is not a valid password hash");
                Ok(false)
            }
        }
    }
}
