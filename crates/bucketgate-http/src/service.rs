//! Gateway HTTP service implementing the hyper `Service` trait.

use std::any::Any;
use std::convert::Infallible;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use futures::FutureExt;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use tracing::{debug, error};

use bucketgate_core::config::DEFAULT_MAX_BODY_BYTES;
use bucketgate_core::error::ApiError;
use bucketgate_core::model::ApiRequest;
use bucketgate_core::provider::ApiRouter;

use crate::body::GatewayResponseBody;
use crate::response::{error_to_response, health_response, into_http_response, preflight_response};

/// Paths answered by the gateway itself with a health report.
const HEALTH_PATHS: &[&str] = &["/health", "/_health"];

/// Configuration for the gateway HTTP service.
#[derive(Debug, Clone)]
pub struct GatewayHttpConfig {
    /// Value of `access-control-allow-origin` on every response.
    pub cors_allow_origin: String,
    /// Largest request body accepted; larger bodies get a 413.
    pub max_body_bytes: usize,
}

impl Default for GatewayHttpConfig {
    fn default() -> Self {
        Self {
            cors_allow_origin: "*".to_owned(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Hyper `Service` implementation for the gateway.
///
/// Wraps an [`ApiRouter`] and turns each incoming HTTP request into an
/// [`ApiRequest`], then the facade's [`bucketgate_core::ApiResponse`] back
/// into an HTTP response.
#[derive(Debug, Clone)]
pub struct GatewayHttpService {
    router: Arc<ApiRouter>,
    config: Arc<GatewayHttpConfig>,
}

impl GatewayHttpService {
    /// Create a new `GatewayHttpService`.
    #[must_use]
    pub fn new(router: Arc<ApiRouter>, config: GatewayHttpConfig) -> Self {
        Self {
            router,
            config: Arc::new(config),
        }
    }
}

impl hyper::service::Service<http::Request<Incoming>> for GatewayHttpService {
    type Response = http::Response<GatewayResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let router = Arc::clone(&self.router);
        let config = Arc::clone(&self.config);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let (parts, incoming) = req.into_parts();
            let response = match collect_body(incoming, config.max_body_bytes).await {
                Ok(body) => process_request(&parts, body, &router).await,
                Err(err) => error_to_response(&err),
            };
            Ok(add_common_headers(response, &config, &request_id))
        })
    }
}

/// Run one request with an already collected body through the pipeline.
///
/// Preflight and health requests are answered here; everything else goes to
/// the router. A panic inside the router becomes a 500 response.
pub async fn process_request(
    parts: &http::request::Parts,
    body: Bytes,
    router: &ApiRouter,
) -> http::Response<GatewayResponseBody> {
    if parts.method == http::Method::OPTIONS {
        return preflight_response();
    }

    if is_health_check(&parts.method, parts.uri.path()) {
        return health_response(router.queue_enabled());
    }

    let req = match to_api_request(parts, &body) {
        Ok(req) => req,
        Err(err) => return error_to_response(&err),
    };

    debug!(method = %req.method, path = %req.path, size = body.len(), "handling request");

    match AssertUnwindSafe(router.handle(req)).catch_unwind().await {
        Ok(resp) => into_http_response(resp),
        Err(panic) => {
            let detail = panic_message(panic.as_ref());
            error!(error = %detail, "request handler panicked");
            error_to_response(&ApiError::internal("Internal Server Error").with_detail(detail))
        }
    }
}

/// Whether the request targets the built-in health endpoint.
#[must_use]
pub fn is_health_check(method: &http::Method, path: &str) -> bool {
    (method == http::Method::GET || method == http::Method::HEAD) && HEALTH_PATHS.contains(&path)
}

/// Build the facade request. An empty body is passed on as absent.
fn to_api_request(parts: &http::request::Parts, body: &Bytes) -> Result<ApiRequest, ApiError> {
    let body = if body.is_empty() {
        None
    } else {
        let text = std::str::from_utf8(body).map_err(|e| {
            ApiError::bad_request("Request body must be UTF-8 text").with_source(e)
        })?;
        Some(text.to_owned())
    };

    let mut req = ApiRequest::new(parts.method.clone(), parts.uri.path(), body);
    req.headers = parts.headers.clone();
    Ok(req)
}

/// Collect the request body into a single `Bytes` buffer, refusing to
/// buffer more than `limit` bytes.
async fn collect_body<B>(body: B, limit: usize) -> Result<Bytes, ApiError>
where
    B: http_body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            let message = format!("Request body exceeds {limit} bytes");
            Err(ApiError::payload_too_large(message))
        }
        Err(e) => {
            let err = ApiError::bad_request("Failed to read request body");
            Err(err.with_detail(e.to_string()))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

/// Add common response headers to every gateway response.
fn add_common_headers(
    mut response: http::Response<GatewayResponseBody>,
    config: &GatewayHttpConfig,
    request_id: &str,
) -> http::Response<GatewayResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry("x-request-id").or_insert(hv);
    }

    headers.insert("server", http::HeaderValue::from_static("bucketgate"));

    let origin = http::HeaderValue::from_str(&config.cors_allow_origin)
        .unwrap_or_else(|_| http::HeaderValue::from_static("*"));
    headers.insert("access-control-allow-origin", origin);

    response
}
