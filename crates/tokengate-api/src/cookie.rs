//! The `access_token` cookie carrying a transparently refreshed token.

use axum::http::HeaderValue;

use tokengate_auth::SignedToken;
use tokengate_core::error::AppError;
use tokengate_core::types::TokenTtl;

/// Name of the refreshed access-token cookie.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Builds the `Set-Cookie` value for a refreshed access token.
///
/// `Max-Age` is the full access-token lifetime and `Path` is the configured
/// cookie scope.
pub fn access_token_cookie(
    token: &SignedToken,
    ttl: TokenTtl,
    path: &str,
) -> Result<HeaderValue, AppError> {
    let cookie = format!(
        "{ACCESS_TOKEN_COOKIE}={}; Path={path}; Max-Age={}; HttpOnly; Secure; SameSite=Strict",
        token.token,
        ttl.as_secs(),
    );
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::internal(format!("Invalid Set-Cookie value: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_cookie_attributes() {
        let token = SignedToken {
            token: "abc.def.ghi".to_string(),
            expires_at: Utc::now(),
        };
        let value = access_token_cookie(&token, TokenTtl::minutes(15), "/api").unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "access_token=abc.def.ghi; Path=/api; Max-Age=900; HttpOnly; Secure; SameSite=Strict"
        );
    }
}
