//! Unified application error types for Tokengate.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The transport layer decides how each
//! [`ErrorKind`] is presented to a client.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Username/password pair was rejected. Never says which half was wrong.
    InvalidCredentials,
    /// No bearer credential was presented.
    MissingToken,
    /// The token or the header carrying it is structurally invalid or its
    /// signature does not verify.
    MalformedToken,
    /// The token's expiry instant has passed.
    ExpiredToken,
    /// A cryptographically valid token was presented for the wrong purpose.
    WrongTokenType,
    /// A refresh token is not the current stored one, or it has expired.
    InvalidRefresh,
    /// No token record exists for the principal.
    TokenNotFound,
    /// The token store or user directory failed.
    Storage,
    /// Configuration is invalid. Fatal at startup.
    Configuration,
    /// Request input validation failed.
    Validation,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether this kind represents a rejected credential of any sort.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::MissingToken
                | Self::MalformedToken
                | Self::ExpiredToken
                | Self::WrongTokenType
                | Self::InvalidRefresh
                | Self::TokenNotFound
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::MissingToken => write!(f, "MISSING_TOKEN"),
            Self::MalformedToken => write!(f, "MALFORMED_TOKEN"),
            Self::ExpiredToken => write!(f, "EXPIRED_TOKEN"),
            Self::WrongTokenType => write!(f, "WRONG_TOKEN_TYPE"),
            Self::InvalidRefresh => write!(f, "INVALID_REFRESH"),
            Self::TokenNotFound => write!(f, "TOKEN_NOT_FOUND"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Tokengate.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-credentials error with the generic message.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid username or password")
    }

    /// Create a missing-token error.
    pub fn missing_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingToken, message)
    }

    /// Create a malformed-token error.
    pub fn malformed_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedToken, message)
    }

    /// Create an expired-token error.
    pub fn expired_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExpiredToken, message)
    }

    /// Create a wrong-token-type error.
    pub fn wrong_token_type(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WrongTokenType, message)
    }

    /// Create an invalid-refresh error.
    pub fn invalid_refresh(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRefresh, message)
    }

    /// Create a token-not-found error.
    pub fn token_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenNotFound, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
