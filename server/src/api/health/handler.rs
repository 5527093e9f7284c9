//! Health Check Handler

use axum::Json;
use axum::extract::State;

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

/// GET /api/health - liveness probe including a storage round trip
pub async fn health(State(state): State<ServerState>) -> AppResult<Json<AppResponse<serde_json::Value>>> {
    // A failing pool should turn the probe red, not just log
    sqlx::query("SELECT 1")
        .execute(&state.pool)
        .await
        .map_err(|e| crate::utils::AppError::database(format!("Health check query failed: {e}")))?;

    Ok(ok(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
