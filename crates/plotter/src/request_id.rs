//! Per-request correlation ids.
//!
//! Each request runs inside a tracing span carrying its id, which is echoed
//! back in the `X-Request-ID` header. A client-supplied id is reused.
//! Handlers that touch a dataset attach its id to the same span with
//! [`record_dataset`], so plot failures can be traced back to their data.

use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, field};
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Attaches the dataset the current request works on to its span.
pub fn record_dataset(id: Uuid) {
    tracing::Span::current().record("dataset_id", field::display(id));
}

fn request_id(request: &Request) -> String {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub async fn request_id_middleware(request: Request, next: Next) -> Response<Body> {
    let request_id = request_id(&request);
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        dataset_id = field::Empty,
    );

    async move {
        let started = Instant::now();
        let mut response = next.run(request).await;
        let status = response.status();
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(REQUEST_ID_HEADER.clone(), value);
        }

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), elapsed_ms, "Request failed");
        } else if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), elapsed_ms, "Request rejected");
        } else {
            tracing::info!(status = status.as_u16(), elapsed_ms, "Request completed");
        }

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reuses_client_id() {
        let request = Request::builder()
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id(&request), "abc-123");
    }

    #[test]
    fn test_generates_id_for_missing_or_empty_header() {
        let request = Request::builder()
            .header("x-request-id", "")
            .body(Body::empty())
            .unwrap();
        assert!(Uuid::parse_str(&request_id(&request)).is_ok());

        let request = Request::builder().body(Body::empty()).unwrap();
        assert!(Uuid::parse_str(&request_id(&request)).is_ok());
    }
}
