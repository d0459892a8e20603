use axum::{extract::Request, middleware::Next, response::Response};
use chrono::Utc;
use tracing::{info, warn};

use super::context::RequestContext;

/// Logs the start and completion of every request. Always forwards.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = sanitize_for_logging(&req.uri().to_string());
    let ctx = req.extensions().get::<RequestContext>().cloned();

    let (request_id, route, started) = match &ctx {
        Some(ctx) => (ctx.request_id.to_string(), ctx.path.clone(), ctx.now),
        None => {
            warn!(uri = %uri, "request context missing in logger");
            (String::from("-"), req.uri().path().to_string(), Utc::now())
        }
    };

    info!(request_id = %request_id, method = %method, route = %route, uri = %uri, "request started");

    let response = next.run(req).await;

    let elapsed = Utc::now() - started;
    info!(
        request_id = %request_id,
        method = %method,
        route = %route,
        status = response.status().as_u16(),
        elapsed_ms = elapsed.num_milliseconds(),
        "request completed"
    );

    response
}

/// Drops control characters and caps the length of client-supplied text before it is logged.
pub fn sanitize_for_logging(input: &str) -> String {
    input.chars().filter(|c| !c.is_control()).take(200).collect()
}
