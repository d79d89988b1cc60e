//! [`TokenStore`] backed by a concurrent hash map.
//!
//! Each operation touches a single map shard under its lock, so an upsert is
//! atomic per username and a dropped future can never leave half a record.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use tokengate_core::models::{TokenFields, TokenRecord};
use tokengate_core::result::AppResult;
use tokengate_core::traits::{Clock, TokenStore};

/// In-memory token records keyed by username.
#[derive(Clone)]
pub struct MemoryTokenStore {
    records: Arc<DashMap<String, TokenRecord>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTokenStore")
            .field("records", &self.records.len())
            .finish()
    }
}

impl MemoryTokenStore {
    /// Creates an empty store stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            clock,
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn upsert(&self, username: &str, fields: TokenFields) -> AppResult<TokenRecord> {
        let now = self.clock.now();
        let record = match self.records.entry(username.to_string()) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().apply(&fields, now);
                occupied.get().clone()
            }
            Entry::Vacant(vacant) => {
                debug!(username = %username, "Creating token record");
                vacant
                    .insert(TokenRecord::create(username, &fields, now))
                    .clone()
            }
        };
        Ok(record)
    }

    async fn find(&self, username: &str) -> AppResult<Option<TokenRecord>> {
        Ok(self.records.get(username).map(|r| r.value().clone()))
    }

    async fn delete(&self, username: &str) -> AppResult<bool> {
        Ok(self.records.remove(username).is_some())
    }
}
