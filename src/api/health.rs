use axum::{extract::State, Json};

use super::error::ApiError;
use super::responses::HealthResponse;
use super::state::AppState;

/// GET /api/v1/health - 503 when the database does not answer
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.pool.ping().await.map_err(|e| {
        tracing::warn!("Health check failed: {:#}", e);
        ApiError::service_unavailable("Database unavailable")
    })?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}
