use std::time::Duration;

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

const READY_TIMEOUT: Duration = Duration::from_secs(5);

// Liveness: no database access
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness: the database must answer within READY_TIMEOUT
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    match crate::db::ping(&state.db, READY_TIMEOUT).await {
        Ok(()) => (StatusCode::OK, "ready").into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {}", e)).into_response(),
    }
}
