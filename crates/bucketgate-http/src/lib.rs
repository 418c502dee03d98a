//! HTTP front door for bucketgate.
//!
//! Adapts hyper requests to the [`bucketgate_core::ApiRouter`] facade:
//!
//! 1. Collect the request body (read failures and non-UTF-8 bodies are 400).
//! 2. Answer CORS preflight (`OPTIONS`) and health checks directly.
//! 3. Hand everything else to the router, converting handler panics to 500.
//! 4. Add the common headers (`x-request-id`, `server`, CORS origin).

pub mod body;
pub mod response;
pub mod service;

pub use body::GatewayResponseBody;
pub use service::{GatewayHttpConfig, GatewayHttpService};
