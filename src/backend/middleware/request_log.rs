/**
 * Request Logging Middleware
 *
 * Logs one line per request with method, path, status and latency.
 * Server errors are logged at `warn`, everything else at `info`.
 */

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    if status.is_server_error() {
        tracing::warn!("[HTTP] {} {} -> {} ({:.1} ms)", method, path, status.as_u16(), elapsed_ms);
    } else {
        tracing::info!("[HTTP] {} {} -> {} ({:.1} ms)", method, path, status.as_u16(), elapsed_ms);
    }

    response
}
