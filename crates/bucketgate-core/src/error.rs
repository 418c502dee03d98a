//! Error types for the bucketgate facade.
//!
//! [`ApiError`] is the taxonomy every operation maps its failures into. Each
//! code carries a default HTTP status; the outer dispatch turns any
//! `ApiError` into a structured JSON response via [`ApiError::to_response`].
//!
//! [`CapabilityError`] is what the object-store and queue capabilities
//! return. Its `Display` form is what ends up in the `error` field of a
//! response body.

use std::fmt;

use serde_json::json;

use crate::model::ApiResponse;

/// The failure classes the facade and front door can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiErrorCode {
    /// Malformed or missing input.
    BadRequest,
    /// Object absent or path unmatched.
    NotFound,
    /// Request body exceeds the configured size limit.
    PayloadTooLarge,
    /// Queue operation requested but no queue is configured.
    NotEnabled,
    /// Capability failure or anything unexpected.
    #[default]
    InternalFailure,
}

impl ApiErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BadRequest",
            Self::NotFound => "NotFound",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::NotEnabled => "NotEnabled",
            Self::InternalFailure => "InternalFailure",
        }
    }

    /// Returns the HTTP status code for this error class.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::BadRequest => http::StatusCode::BAD_REQUEST,
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => http::StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotEnabled => http::StatusCode::NOT_IMPLEMENTED,
            Self::InternalFailure => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A facade error destined to become an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    /// The error class.
    pub code: ApiErrorCode,
    /// Human-readable message, rendered as the `message` field.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// Stringified underlying error, rendered as the `error` field.
    pub detail: Option<String>,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiError({}): {}", self.code, self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl ApiError {
    /// Create a new `ApiError` with a custom message.
    #[must_use]
    pub fn with_message(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            detail: None,
            source: None,
        }
    }

    /// Attach a stringified detail shown to the caller as `error`.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach the source error. Its `Display` form becomes the detail unless
    /// one was already set.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        if self.detail.is_none() {
            self.detail = Some(source.to_string());
        }
        self.source = Some(Box::new(source));
        self
    }

    // -- Convenience constructors --

    /// Malformed or missing input (400).
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(ApiErrorCode::BadRequest, message)
    }

    /// Object absent or route unmatched (404).
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(ApiErrorCode::NotFound, message)
    }

    /// Request body over the size limit (413).
    #[must_use]
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::with_message(ApiErrorCode::PayloadTooLarge, message)
    }

    /// Feature not configured (501).
    #[must_use]
    pub fn not_enabled(message: impl Into<String>) -> Self {
        Self::with_message(ApiErrorCode::NotEnabled, message)
    }

    /// Internal failure (500).
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(ApiErrorCode::InternalFailure, message)
    }

    /// Render the structured error body: `{"message": ..., "error"?: ...}`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match &self.detail {
            Some(detail) => json!({ "message": self.message, "error": detail }),
            None => json!({ "message": self.message }),
        }
    }

    /// Convert into a complete JSON response.
    #[must_use]
    pub fn to_response(&self) -> ApiResponse {
        ApiResponse::json(self.status_code, &self.to_json())
    }
}

/// Failure reported by an object-store or queue capability.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    /// The requested object does not exist.
    #[error("NoSuchKey: the specified key does not exist: {key}")]
    NotFound {
        /// The key that was not found.
        key: String,
    },

    /// The remote service rejected the call or could not be reached.
    #[error("{operation} failed: {message}")]
    Service {
        /// Capability operation name, e.g. `"GetObject"`.
        operation: &'static str,
        /// Stringified service error.
        message: String,
    },
}

impl CapabilityError {
    /// Build a [`CapabilityError::Service`] from any displayable error.
    #[must_use]
    pub fn service(operation: &'static str, err: impl fmt::Display) -> Self {
        Self::Service {
            operation,
            message: err.to_string(),
        }
    }
}
