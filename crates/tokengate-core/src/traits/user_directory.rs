//! Lookup of principals by username.

use async_trait::async_trait;

use crate::models::Identity;
use crate::result::AppResult;

/// External user directory consulted at login.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Finds the principal with exactly this username.
    ///
    /// `Ok(None)` means "no such user"; `Err` is reserved for directory
    /// failures and must use `ErrorKind::Storage`.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Identity>>;
}
