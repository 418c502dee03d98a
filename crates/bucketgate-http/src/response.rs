//! Conversion from facade responses to HTTP responses, plus the responses
//! the gateway answers on its own (CORS preflight, health).

use bucketgate_core::error::ApiError;
use bucketgate_core::model::{ApiResponse, JSON_CONTENT_TYPE};

use crate::body::GatewayResponseBody;

/// Methods advertised in CORS preflight responses.
pub const CORS_ALLOW_METHODS: &str = "DELETE,GET,HEAD,OPTIONS,PATCH,POST,PUT";

/// Request headers advertised in CORS preflight responses.
pub const CORS_ALLOW_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token,X-Amz-User-Agent";

/// Server version reported in health check responses.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convert a facade response into an HTTP response, keeping status, headers
/// and body as-is.
#[must_use]
pub fn into_http_response(resp: ApiResponse) -> http::Response<GatewayResponseBody> {
    let mut response = http::Response::new(GatewayResponseBody::from_bytes(resp.body));
    *response.status_mut() = resp.status;
    *response.headers_mut() = resp.headers;
    response
}

/// Convert an [`ApiError`] into a complete HTTP error response.
#[must_use]
pub fn error_to_response(error: &ApiError) -> http::Response<GatewayResponseBody> {
    into_http_response(error.to_response())
}

/// `204 No Content` answer to a CORS preflight request.
#[must_use]
pub fn preflight_response() -> http::Response<GatewayResponseBody> {
    let mut response = http::Response::new(GatewayResponseBody::empty());
    *response.status_mut() = http::StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    headers.insert(
        "access-control-allow-methods",
        http::HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        "access-control-allow-headers",
        http::HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    response
}

/// Health check response reporting whether the queue is configured.
#[must_use]
pub fn health_response(queue_enabled: bool) -> http::Response<GatewayResponseBody> {
    let body = serde_json::json!({
        "status": "running",
        "queue": if queue_enabled { "enabled" } else { "disabled" },
        "version": VERSION,
    });
    let mut response =
        http::Response::new(GatewayResponseBody::from_bytes(body.to_string()));
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static(JSON_CONTENT_TYPE),
    );
    response
}
