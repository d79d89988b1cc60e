//! Collaborator traits defined in `tokengate-core` and implemented by other
//! crates.

pub mod audit_log;
pub mod clock;
pub mod token_store;
pub mod user_directory;

pub use audit_log::AuditLog;
pub use clock::{Clock, ManualClock, SystemClock};
pub use token_store::TokenStore;
pub use user_directory::UserDirectory;
