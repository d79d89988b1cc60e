//! Repository implementations of the core collaborator traits.

pub mod audit;
pub mod token;
pub mod user;

pub use audit::AuditLogRepository;
pub use token::TokenRepository;
pub use user::UserRepository;
