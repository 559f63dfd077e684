//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, matched path, status
//! - `http_request_duration_seconds` (histogram): latency by method, matched path
//! - `csrf_tokens_issued_total` (counter): tokens handed out by protected forms
//! - `csrf_validation_failures_total` (counter): rejected protected submissions

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "http_requests_total",
        "method" => method.to_owned(),
        "path" => path.to_owned(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_owned(),
        "path" => path.to_owned()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_csrf_issued() {
    ::metrics::counter!("csrf_tokens_issued_total").increment(1);
}

pub fn record_csrf_rejected() {
    ::metrics::counter!("csrf_validation_failures_total").increment(1);
}

/// Middleware recording request count and latency.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(request).await;
    record_request(&method, &path, response.status().as_u16(), start);
    response
}
