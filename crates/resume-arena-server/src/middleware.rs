//! Request timing middleware.
//!
//! Logs every request with its duration so slow endpoints (typically large
//! leaderboard pages or contended votes) show up in the logs.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Middleware that logs request timing.
///
/// Requests taking longer than 100ms are logged as warnings, the rest at
/// debug level.
pub async fn timing_layer(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status().as_u16();

    if duration.as_millis() > 100 {
        tracing::warn!(
            method = %method,
            path = %path,
            status = status,
            duration_ms = duration.as_millis(),
            "Slow request"
        );
    } else {
        tracing::debug!(
            method = %method,
            path = %path,
            status = status,
            duration_ms = duration.as_millis(),
            "Request completed"
        );
    }

    response
}
