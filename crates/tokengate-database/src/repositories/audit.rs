//! Audit log repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use tokengate_core::models::AuditLevel;
use tokengate_core::traits::AuditLog;

/// Appends authentication events to the `audit_log` table.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for AuditLogRepository {
    async fn record(&self, level: AuditLevel, message: &str, context: serde_json::Value) {
        let result = sqlx::query("INSERT INTO audit_log (level, message, context) VALUES ($1, $2, $3)")
            .bind(level.as_str())
            .bind(message)
            .bind(&context)
            .execute(&self.pool)
            .await;

        if let Err(e) = result {
            warn!(error = %e, audit_message = %message, "Failed to write audit log entry");
        }
    }
}
