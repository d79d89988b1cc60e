//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let (status, database) = match &state.database {
        None => (StatusCode::OK, "not configured"),
        Some(pool) => match pool.health_check().await {
            Ok(()) => (StatusCode::OK, "connected"),
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                (StatusCode::SERVICE_UNAVAILABLE, "unreachable")
            }
        },
    };

    let body = HealthResponse {
        status: if status == StatusCode::OK { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    };

    (status, Json(ApiResponse::ok(body)))
}
