//! Request id propagation and the per-request tracing span.
//!
//! Every request runs inside a span tagged with its id. Inbound `X-Request-ID`
//! values are kept so ids stay stable across proxies; a missing or unusable
//! header gets a fresh UUID. The id is echoed on the response either way.

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the request id, inbound and outbound.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound id accepted before minting a fresh one.
const MAX_REQUEST_ID_LEN: usize = 64;

/// Request id stored in request extensions for handlers that need it.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn resolve_request_id(req: &Request<Body>) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Middleware running each request inside a span carrying its id.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = resolve_request_id(&req);
    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let start = std::time::Instant::now();
        let mut response = next.run(req).await;

        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_header(value: &str) -> Request<Body> {
        Request::builder()
            .uri("/api/health")
            .header(REQUEST_ID_HEADER, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_inbound_id_is_kept() {
        let req = request_with_header("proxy-abc-123");
        assert_eq!(resolve_request_id(&req), "proxy-abc-123");
    }

    #[test]
    fn test_missing_id_gets_a_uuid() {
        let req = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let id = resolve_request_id(&req);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_empty_id_is_replaced() {
        let req = request_with_header("");
        assert!(Uuid::parse_str(&resolve_request_id(&req)).is_ok());
    }

    #[test]
    fn test_oversized_id_is_replaced() {
        let long_id = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        let req = request_with_header(&long_id);
        assert!(Uuid::parse_str(&resolve_request_id(&req)).is_ok());
    }
}
