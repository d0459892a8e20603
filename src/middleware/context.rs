use axum::{
    extract::{FromRequestParts, MatchedPath, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;

/// Values scoped to a single request.
///
/// Built once by [`request_context`] before any handler runs and read back by
/// handlers as an extractor. `now` is the timestamp used for every write the
/// request performs.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub now: DateTime<Utc>,
    /// Matched route pattern, or the raw path when no route matched.
    pub path: String,
}

impl RequestContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self { request_id: Uuid::new_v4(), now: Utc::now(), path: path.into() }
    }
}

/// Attaches a fresh [`RequestContext`] to the request.
pub async fn request_context(mut req: Request, next: Next) -> Response {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    req.extensions_mut().insert(RequestContext::new(path));
    next.run(req).await
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("request context missing")))
    }
}
