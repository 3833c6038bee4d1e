//! Request logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

/// Logs method, path, status and latency of every request.
///
/// Refused streams (4xx/5xx) are logged at `warn` so capacity exhaustion
/// stands out from normal ingestion traffic.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let latency_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

    if response.status().is_success() {
        info!(method = %method, path = %path, status, latency_us, "HTTP request");
    } else {
        warn!(method = %method, path = %path, status, latency_us, "HTTP request refused");
    }

    response
}
