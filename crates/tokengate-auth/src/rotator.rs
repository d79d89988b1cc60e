//! Best-effort access-token rotation after a protected handler has run.
//!
//! Rotation never fails the request: every problem becomes
//! [`RotationOutcome::Skipped`] and a `warn` log line.

use std::sync::Arc;

use tracing::{debug, warn};

use tokengate_core::error::AppError;

use crate::issuer::TokenIssuer;
use crate::jwt::{SignedToken, TokenPayload};

/// Why no new access token was produced.
#[derive(Debug, Clone)]
pub enum SkipReason {
    /// The principal has no stored refresh token.
    NoStoredRefresh,
    /// Rotation was attempted and failed.
    Failed(AppError),
}

/// Result of a transparent refresh attempt.
#[derive(Debug, Clone)]
pub enum RotationOutcome {
    /// A new access token was minted and persisted.
    Rotated(SignedToken),
    /// Nothing was minted.
    Skipped(SkipReason),
}

impl RotationOutcome {
    /// The new access token, if one was minted.
    pub fn rotated(self) -> Option<SignedToken> {
        match self {
            Self::Rotated(token) => Some(token),
            Self::Skipped(_) => None,
        }
    }
}

/// Mints a fresh access token from the stored refresh token.
#[derive(Debug, Clone)]
pub struct RefreshRotator {
    issuer: Arc<TokenIssuer>,
}

impl RefreshRotator {
    /// Creates a rotator delegating to `issuer`.
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }

    /// Attempts one rotation for the principal in `identity`.
    pub async fn rotate(&self, identity: &TokenPayload) -> RotationOutcome {
        let username = identity.username.as_str();

        let stored = match self.issuer.stored_refresh(username).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!(username = %username, "No stored refresh token; skipping rotation");
                return RotationOutcome::Skipped(SkipReason::NoStoredRefresh);
            }
            Err(e) => return skipped(username, e),
        };

        match self.issuer.rotate_access(username, &stored).await {
            Ok(token) => RotationOutcome::Rotated(token),
            Err(e) => skipped(username, e),
        }
    }
}

fn skipped(username: &str, err: AppError) -> RotationOutcome {
    warn!(username = %username, error = %err, "Transparent refresh skipped");
    RotationOutcome::Skipped(SkipReason::Failed(err))
}
