//! HTTP surface of the service.
//!
//! - `fundmeta`: CRUD over mutual fund metadata under `/v1/mutualfundmeta`
//! - `teapot`: `/v1/teapot`
//! - `health`: liveness and readiness probes
//! - `extract`: request body extraction and the JSON response helper

pub mod extract;
pub mod fundmeta;
pub mod health;
pub mod teapot;

use axum::{
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};

use crate::{middleware, state::AppState};

/// Request body cap for write routes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Builds the application router. Shared by `main` and the router tests.
pub fn router(state: AppState) -> Router {
    let app = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/v1/teapot", get(teapot::teapot))
        .route(
            "/v1/mutualfundmeta",
            post(fundmeta::create).layer(DefaultBodyLimit::max(MAX_BODY_BYTES)).get(fundmeta::query),
        )
        .route(
            "/v1/mutualfundmeta/{key}",
            put(fundmeta::update)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
                .get(fundmeta::query_by_id)
                .delete(fundmeta::delete),
        )
        .fallback(not_found)
        .with_state(state);
    with_pipeline(app)
}

/// Applies the global middleware. Layers wrap what is above them, so the
/// context is built before the logger and every inner layer runs.
pub fn with_pipeline(app: Router) -> Router {
    app.layer(from_fn(middleware::logger::log_requests))
        .layer(from_fn(middleware::context::request_context))
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, format!("path not found: {}", uri))
}
