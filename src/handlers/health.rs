use axum::extract::State;
use serde_json::{json, Value};

use crate::database;
use crate::error::ApiError;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Liveness plus backing-store connectivity.
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    database::health_check(&state.pool).await.map_err(|err| {
        tracing::error!("Health check failed: {}", err);
        ApiError::service_unavailable("Database unreachable")
    })?;

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "database": "connected",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
