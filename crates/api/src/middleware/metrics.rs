//! HTTP metrics and the Prometheus export endpoint.
//!
//! Two series per request: `http_requests_total` (method, path, status) and
//! `http_request_duration_seconds` (method, path). Path labels are normalized
//! so gathering ids and invite codes collapse into one series per route.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;
use uuid::Uuid;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Buckets spanning fast handler hits through the slowest deletion cascades.
const DURATION_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0,
];

/// Collapses path parameters so each route is a single label value: UUID
/// segments become `:id`, six-digit invite codes become `:code`.
fn route_label(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                ":id"
            } else if segment.len() == 6 && segment.bytes().all(|b| b.is_ascii_digit()) {
                ":code"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Middleware recording a counter and a duration histogram per request.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_string();
    // MatchedPath only exists once routing has run; this layer sits outside
    // the router, so the normalizer carries the label
    let path = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => route_label(req.uri().path()),
    };

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Handler for the Prometheus text endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(CONTENT_TYPE, "text/plain")],
            "Metrics recorder not installed".to_string(),
        ),
    }
}

/// Installs the global Prometheus recorder.
///
/// Must run once at startup, before anything records a metric.
pub fn init_metrics() {
    let handle = PrometheusBuilder::new()
        .set_buckets(DURATION_BUCKETS)
        .expect("Failed to set histogram buckets")
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    if PROMETHEUS_HANDLE.set(handle).is_err() {
        panic!("Prometheus recorder already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_label_collapses_uuids() {
        let path = "/api/gatherings/550e8400-e29b-41d4-a716-446655440000/items";
        assert_eq!(route_label(path), "/api/gatherings/:id/items");
    }

    #[test]
    fn test_route_label_collapses_every_uuid_segment() {
        let path = format!(
            "/api/gatherings/{}/items/{}",
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        assert_eq!(route_label(&path), "/api/gatherings/:id/items/:id");
    }

    #[test]
    fn test_route_label_collapses_invite_codes() {
        assert_eq!(route_label("/api/invites/123456"), "/api/invites/:code");
        assert_eq!(
            route_label("/api/invites/123456/join"),
            "/api/invites/:code/join"
        );
    }

    #[test]
    fn test_route_label_keeps_static_routes() {
        assert_eq!(route_label("/api/health"), "/api/health");
        assert_eq!(route_label("/api/auth/send-code"), "/api/auth/send-code");
        assert_eq!(route_label("/metrics"), "/metrics");
    }

    #[test]
    fn test_route_label_ignores_short_numbers() {
        assert_eq!(route_label("/api/v2/health"), "/api/v2/health");
    }
}
