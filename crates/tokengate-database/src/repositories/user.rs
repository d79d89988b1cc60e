//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use tokengate_core::error::{AppError, ErrorKind};
use tokengate_core::models::Identity;
use tokengate_core::result::AppResult;
use tokengate_core::traits::UserDirectory;

/// Repository for principals that may log in.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new principal. `password_hash` must already be a PHC string.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        group_id: &str,
    ) -> AppResult<Identity> {
        sqlx::query_as::<_, Identity>(
            "INSERT INTO users (subject_id, username, password_hash, group_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING subject_id, username, password_hash, group_id",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                AppError::validation(format!("Username '{username}' already exists"))
            } else {
                AppError::with_source(ErrorKind::Storage, "Failed to create user", e)
            }
        })
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Identity>> {
        sqlx::query_as::<_, Identity>(
            "SELECT subject_id, username, password_hash, group_id FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to find user", e))
    }
}
