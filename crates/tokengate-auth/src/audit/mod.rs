//! Audit sinks that need no database.
//!
//! [`TracingAuditLog`] forwards events to the tracing subscriber and is used
//! when persistent auditing is disabled. [`MemoryAuditLog`] keeps events for
//! inspection in tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, warn};

use tokengate_core::models::{AuditEntry, AuditLevel};
use tokengate_core::traits::AuditLog;

/// Writes audit events as structured log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLog;

#[async_trait]
impl AuditLog for TracingAuditLog {
    async fn record(&self, level: AuditLevel, message: &str, context: serde_json::Value) {
        match level {
            AuditLevel::Info => info!(target: "tokengate::audit", context = %context, "{message}"),
            AuditLevel::Warn => warn!(target: "tokengate::audit", context = %context, "{message}"),
            AuditLevel::Error => {
                error!(target: "tokengate::audit", context = %context, "{message}")
            }
        }
    }
}

/// Collects audit events in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl MemoryAuditLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Recorded messages, in order.
    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn record(&self, level: AuditLevel, message: &str, context: serde_json::Value) {
        let entry = AuditEntry {
            level,
            message: message.to_string(),
            context,
            created_at: Utc::now(),
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
    }
}
