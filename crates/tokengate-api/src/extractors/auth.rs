//! `AuthUser` extractor: the identity verified by `require_auth`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use tokengate_auth::TokenPayload;
use tokengate_core::error::AppError;

use crate::error::ApiError;

/// Authenticated caller available in protected handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub TokenPayload);

impl std::ops::Deref for AuthUser {
    type Target = TokenPayload;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenPayload>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::missing_token("Request was not authenticated").into())
    }
}
