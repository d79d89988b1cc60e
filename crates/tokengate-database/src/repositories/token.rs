//! Token record repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use tokengate_core::error::{AppError, ErrorKind};
use tokengate_core::models::{TokenFields, TokenRecord};
use tokengate_core::result::AppResult;
use tokengate_core::traits::TokenStore;

/// Merges a field set into the record in one statement. A `NULL` parameter
/// leaves the existing column untouched, and the unique key on `username`
/// guarantees a single record under concurrent logins.
const UPSERT_SQL: &str = "\
INSERT INTO token_records \
    (username, access_token, expires_at_access, refresh_token, expires_at_refresh, group_id) \
VALUES ($1, $2, $3, $4, $5, $6) \
ON CONFLICT (username) DO UPDATE SET \
    access_token = COALESCE(EXCLUDED.access_token, token_records.access_token), \
    expires_at_access = COALESCE(EXCLUDED.expires_at_access, token_records.expires_at_access), \
    refresh_token = COALESCE(EXCLUDED.refresh_token, token_records.refresh_token), \
    expires_at_refresh = COALESCE(EXCLUDED.expires_at_refresh, token_records.expires_at_refresh), \
    group_id = COALESCE(EXCLUDED.group_id, token_records.group_id), \
    updated_at = NOW() \
RETURNING *";

/// Repository for the per-username token record.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for TokenRepository {
    async fn upsert(&self, username: &str, fields: TokenFields) -> AppResult<TokenRecord> {
        let (access_token, expires_at_access) = match fields.access {
            Some(access) => (Some(access.token), Some(access.expires_at)),
            None => (None, None),
        };
        let (refresh_token, expires_at_refresh) = match fields.refresh {
            Some(refresh) => (Some(refresh.token), Some(refresh.expires_at)),
            None => (None, None),
        };

        sqlx::query_as::<_, TokenRecord>(UPSERT_SQL)
            .bind(username)
            .bind(access_token)
            .bind(expires_at_access)
            .bind(refresh_token)
            .bind(expires_at_refresh)
            .bind(fields.group_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to upsert token record", e)
            })
    }

    async fn find(&self, username: &str) -> AppResult<Option<TokenRecord>> {
        sqlx::query_as::<_, TokenRecord>("SELECT * FROM token_records WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to find token record", e)
            })
    }

    async fn delete(&self, username: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM token_records WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to delete token record", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
