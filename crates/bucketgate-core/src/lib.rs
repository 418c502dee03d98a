//! Request routing and storage/queue facade for bucketgate.
//!
//! The facade maps an HTTP-shaped request to one of three operations and runs
//! it against injected capabilities:
//!
//! ```text
//! ApiRequest
//!     |
//!     v
//! router::resolve_operation  (method + path prefix)
//!     |
//!     v
//! ApiRouter                  (validate body, call capability, map errors)
//!     |                \
//!     v                 v
//! dyn ObjectStore    Option<dyn MessageQueue>
//! ```
//!
//! Capability implementations live in `bucketgate-aws` (S3, SQS) and in
//! [`memory`] (process-local, for tests and local runs).

pub mod capability;
pub mod config;
pub mod error;
pub mod memory;
pub mod model;
pub mod operations;
pub mod provider;
pub mod router;

pub use capability::{MessageQueue, ObjectStore};
pub use config::{Backend, GatewayConfig};
pub use error::{ApiError, ApiErrorCode, CapabilityError};
pub use model::{ApiRequest, ApiResponse, QueueMessage, StoredObject};
pub use provider::ApiRouter;
