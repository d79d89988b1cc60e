//! Auth handlers: login, refresh, logout, me.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use crate::dto::request::{LoginRequest, RefreshRequest};
use crate::dto::response::{
    ApiResponse, IdentityResponse, LoginResponse, MessageResponse, RefreshResponse,
};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    req.validate()?;

    let pair = state.issuer.login(&req.username, &req.password).await?;

    Ok(Json(ApiResponse::ok(LoginResponse::from(pair))))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    req.validate()?;

    let token = state
        .issuer
        .rotate_access(&req.username, &req.refresh_token)
        .await?;

    Ok(Json(ApiResponse::ok(RefreshResponse::from(token))))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.issuer.logout(&auth.username).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Logged out successfully".to_string(),
    })))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<IdentityResponse>> {
    Json(ApiResponse::ok(IdentityResponse::from(&auth.0)))
}
