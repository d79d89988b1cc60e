//! # tokengate-auth
//!
//! The token lifecycle and access-gating subsystem.
//!
//! ## Modules
//!
//! - `jwt`: token payload, HS256 signing and verification against an injected clock
//! - `password`: Argon2id password hashing and verification
//! - `credential`: username/password verification against the user directory
//! - `store`: in-process token store
//! - `issuer`: login, access rotation, logout
//! - `guard`: synchronous per-request bearer validation
//! - `rotator`: best-effort transparent refresh after a protected handler
//! - `directory`, `audit`: in-process collaborator implementations

pub mod audit;
pub mod credential;
pub mod directory;
pub mod guard;
pub mod issuer;
pub mod jwt;
pub mod password;
pub mod rotator;
pub mod store;

#[cfg(test)]
mod testing;

pub use audit::{MemoryAuditLog, TracingAuditLog};
pub use credential::CredentialVerifier;
pub use directory::MemoryUserDirectory;
pub use guard::AccessGuard;
pub use issuer::{IssuedPair, TokenIssuer};
pub use jwt::{SignedToken, TokenCodec, TokenKind, TokenPayload};
pub use password::PasswordHasher;
pub use rotator::{RefreshRotator, RotationOutcome, SkipReason};
pub use store::MemoryTokenStore;
