//! Principal identity as held by the external user directory.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A principal that may authenticate. Read-only to Tokengate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Identity {
    /// Stable subject identifier, embedded as `sub` in every token.
    pub subject_id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Argon2id PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Group the principal belongs to, embedded as `group` in every token.
    pub group_id: String,
}
