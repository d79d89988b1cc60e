//! Bearer authentication for protected routes.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use tokengate_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Rejects the request unless it carries a valid access token for a session
/// that still exists.
///
/// On success the verified `TokenPayload` is placed in the request
/// extensions, where `AuthUser` and `transparent_refresh` pick it up.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (identity, token) = {
        let header = request
            .headers()
            .get(AUTHORIZATION)
            .map(|value| {
                value.to_str().map_err(|_| {
                    AppError::malformed_token("Authorization header is not valid text")
                })
            })
            .transpose()?;

        let (identity, token) = state.guard.authorize_bearer(header).inspect_err(|e| {
            debug!(reason = %e.kind, path = %request.uri().path(), "Request rejected by access guard");
        })?;
        (identity, token.to_owned())
    };

    state.issuer.ensure_active_session(&identity, &token).await?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
