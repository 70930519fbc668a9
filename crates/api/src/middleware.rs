use std::time::Instant;

use axum::{middleware::Next, response::Response};

/// Log one line per request once the response status is known.
pub async fn log_requests(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let res = next.run(req).await;

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::info!(
        %method,
        %path,
        status = res.status().as_u16(),
        elapsed_ms,
        "request handled"
    );
    res
}
