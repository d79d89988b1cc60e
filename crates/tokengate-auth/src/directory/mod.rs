//! In-process user directory.

use async_trait::async_trait;
use dashmap::DashMap;

use tokengate_core::models::Identity;
use tokengate_core::result::AppResult;
use tokengate_core::traits::UserDirectory;

/// A [`UserDirectory`] held in memory, keyed by exact username.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: DashMap<String, Identity>,
}

impl MemoryUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a principal.
    pub fn insert(&self, identity: Identity) {
        self.users.insert(identity.username.clone(), identity);
    }

    /// Number of principals.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory holds no principals.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Identity>> {
        Ok(self.users.get(username).map(|entry| entry.value().clone()))
    }
}
