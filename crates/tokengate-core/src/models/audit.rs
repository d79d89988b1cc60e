//! Audit events emitted by the token lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    /// Routine event (login, logout, rotation).
    Info,
    /// Rejected attempt.
    Warn,
    /// Failure of the subsystem itself.
    Error,
}

impl AuditLevel {
    /// Lowercase name as stored in the audit table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audit log row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Severity.
    pub level: AuditLevel,
    /// Short event description.
    pub message: String,
    /// Structured context (username, reason, ...). Never contains tokens.
    pub context: serde_json::Value,
    /// When the event was recorded.
    pub created_at: DateTime<Utc>,
}
