//! The per-principal token record and the field sets used to update it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single persisted token record for a username.
///
/// Access and refresh halves are independent; overwriting one never touches
/// the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TokenRecord {
    /// Unique key.
    pub username: String,
    /// Most recently issued access token.
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    /// Most recently issued refresh token.
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    /// Authoritative access-token expiry.
    pub expires_at_access: Option<DateTime<Utc>>,
    /// Authoritative refresh-token expiry.
    pub expires_at_refresh: Option<DateTime<Utc>>,
    /// Group of the principal at the last login.
    pub group_id: Option<String>,
    /// When the record was first created.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl TokenRecord {
    /// The stored access token together with its expiry, if both are set.
    pub fn access(&self) -> Option<StoredToken> {
        StoredToken::pair(self.access_token.as_ref(), self.expires_at_access)
    }

    /// The stored refresh token together with its expiry, if both are set.
    pub fn refresh(&self) -> Option<StoredToken> {
        StoredToken::pair(self.refresh_token.as_ref(), self.expires_at_refresh)
    }

    /// Applies a field set the way every store implementation must: present
    /// fields overwrite, absent fields are kept.
    pub fn apply(&mut self, fields: &TokenFields, now: DateTime<Utc>) {
        if let Some(access) = &fields.access {
            self.access_token = Some(access.token.clone());
            self.expires_at_access = Some(access.expires_at);
        }
        if let Some(refresh) = &fields.refresh {
            self.refresh_token = Some(refresh.token.clone());
            self.expires_at_refresh = Some(refresh.expires_at);
        }
        if let Some(group) = &fields.group_id {
            self.group_id = Some(group.clone());
        }
        self.updated_at = now;
    }

    /// A new record for `username` with `fields` applied.
    pub fn create(username: &str, fields: &TokenFields, now: DateTime<Utc>) -> Self {
        let mut record = Self {
            username: username.to_string(),
            access_token: None,
            refresh_token: None,
            expires_at_access: None,
            expires_at_refresh: None,
            group_id: None,
            created_at: now,
            updated_at: now,
        };
        record.apply(fields, now);
        record
    }
}

/// A token string paired with its authoritative expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredToken {
    /// Compact signed token.
    pub token: String,
    /// Authoritative expiry instant.
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    fn pair(token: Option<&String>, expires_at: Option<DateTime<Utc>>) -> Option<Self> {
        match (token, expires_at) {
            (Some(token), Some(expires_at)) => Some(Self {
                token: token.clone(),
                expires_at,
            }),
            _ => None,
        }
    }

    /// Whether the stored expiry has been reached at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Fields to merge into a [`TokenRecord`]. `None` means "leave as is".
///
/// A token and its expiry travel together in [`StoredToken`] so an upsert
/// can never write one without the other.
#[derive(Debug, Clone, Default)]
pub struct TokenFields {
    /// New access token and expiry.
    pub access: Option<StoredToken>,
    /// New refresh token and expiry.
    pub refresh: Option<StoredToken>,
    /// New group.
    pub group_id: Option<String>,
}

impl TokenFields {
    /// Field set touching only the access half.
    pub fn access_only(access: StoredToken) -> Self {
        Self {
            access: Some(access),
            ..Self::default()
        }
    }
}
