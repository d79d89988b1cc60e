//! Transparent access-token refresh after a protected handler.
//!
//! The handler's response goes back unchanged except for an added
//! `Set-Cookie` header when rotation succeeded. Rotation failures are logged
//! by the rotator and otherwise ignored.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use tokengate_auth::{RotationOutcome, TokenPayload};

use crate::cookie::access_token_cookie;
use crate::state::AppState;

/// Runs the handler, then rotates the caller's access token.
///
/// Must sit inside `require_auth`, which supplies the identity. The rotation
/// runs on its own task so that a client disconnect cannot cancel it between
/// the store read and the store write.
pub async fn transparent_refresh(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let identity = request.extensions().get::<TokenPayload>().cloned();
    let mut response = next.run(request).await;

    let Some(identity) = identity else {
        return response;
    };

    let rotator = Arc::clone(&state.rotator);
    let outcome = match tokio::spawn(async move { rotator.rotate(&identity).await }).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "Transparent refresh task failed");
            return response;
        }
    };

    if let RotationOutcome::Rotated(token) = outcome {
        let auth = &state.config.auth;
        match access_token_cookie(&token, auth.access_token_ttl, &auth.cookie_path) {
            Ok(cookie) => {
                response.headers_mut().append(SET_COOKIE, cookie);
            }
            Err(e) => warn!(error = %e, "Could not attach refreshed access token"),
        }
    }

    response
}
