//! Persistence of the per-username token record.

use async_trait::async_trait;

use crate::models::{TokenFields, TokenRecord};
use crate::result::AppResult;

/// Stores exactly one [`TokenRecord`] per username.
///
/// Implementations must make each call atomic per key: an `upsert` either
/// lands completely or not at all, and two concurrent upserts for the same
/// username resolve as last-write-wins without ever creating a second
/// record. No guarantee is made across a `find` followed by an `upsert`.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Merges `fields` into the record for `username`, creating it if absent,
    /// and returns the record as written.
    async fn upsert(&self, username: &str, fields: TokenFields) -> AppResult<TokenRecord>;

    /// Returns the record for `username`, if any.
    async fn find(&self, username: &str) -> AppResult<Option<TokenRecord>>;

    /// Removes the record for `username`. Returns `true` if one existed.
    async fn delete(&self, username: &str) -> AppResult<bool>;
}
