//! Request, response, and payload types exchanged with the facade.

use bytes::Bytes;
use serde::Deserialize;

/// Content type used for every JSON body the facade produces.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type reported when a stored object declares none.
pub const DEFAULT_OBJECT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type applied to uploads that do not specify one.
pub const DEFAULT_UPLOAD_CONTENT_TYPE: &str = "application/json";

/// An HTTP-shaped request handed to the facade by the front door.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Request method.
    pub method: http::Method,
    /// Request path, without query string.
    pub path: String,
    /// Request body, `None` when the front door received no bytes.
    pub body: Option<String>,
    /// Request headers.
    pub headers: http::HeaderMap,
}

impl ApiRequest {
    /// Create a request with no headers.
    #[must_use]
    pub fn new(method: http::Method, path: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
            headers: http::HeaderMap::new(),
        }
    }
}

/// An HTTP-shaped response returned by the facade.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Response status.
    pub status: http::StatusCode,
    /// Response headers. Always carries `content-type`.
    pub headers: http::HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl ApiResponse {
    /// Build a JSON response from a value.
    #[must_use]
    pub fn json(status: http::StatusCode, value: &serde_json::Value) -> Self {
        Self::raw(status, JSON_CONTENT_TYPE, Bytes::from(value.to_string()))
    }

    /// Build a response with an arbitrary body and content type.
    ///
    /// A content type that is not a valid header value is replaced with
    /// [`DEFAULT_OBJECT_CONTENT_TYPE`].
    #[must_use]
    pub fn raw(status: http::StatusCode, content_type: &str, body: impl Into<Bytes>) -> Self {
        let value = http::HeaderValue::from_str(content_type)
            .unwrap_or(http::HeaderValue::from_static(DEFAULT_OBJECT_CONTENT_TYPE));
        let mut headers = http::HeaderMap::new();
        headers.insert(http::header::CONTENT_TYPE, value);
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// The `content-type` header, if it is valid UTF-8.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// An object as read from or written to the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key.
    pub key: String,
    /// Object bytes.
    pub content: Bytes,
    /// Declared content type, if the store reports one.
    pub content_type: Option<String>,
}

/// A message submitted to the queue. The body is JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// JSON-encoded message body.
    pub body: String,
}

/// Body of `POST /api/files`.
///
/// Fields are optional at the serde level so that absence is reported with
/// the facade's own message rather than a serde error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileInput {
    /// Object key to write.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Object content.
    #[serde(default)]
    pub content: Option<String>,
    /// Content type to store. Defaults to [`DEFAULT_UPLOAD_CONTENT_TYPE`].
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Body of `POST /api/queue`. A JSON `null` message counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessageInput {
    /// Arbitrary JSON payload to enqueue.
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}
