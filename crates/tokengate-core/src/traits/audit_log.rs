//! Fire-and-forget audit sink.

use async_trait::async_trait;

use crate::models::AuditLevel;

/// Receives authentication events.
///
/// `record` returns nothing on purpose: an audit sink that fails must log
/// and move on, never fail the operation being audited.
#[async_trait]
pub trait AuditLog: Send + Sync + 'static {
    /// Records one event.
    async fn record(&self, level: AuditLevel, message: &str, context: serde_json::Value);
}
