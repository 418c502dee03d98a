//! The storage/queue facade.
//!
//! [`ApiRouter`] resolves each request to an [`ApiOperation`], runs it
//! against the injected capabilities, and turns every failure into a
//! structured response. [`ApiRouter::handle`] is infallible: callers always
//! get an [`ApiResponse`] back.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::capability::{MessageQueue, ObjectStore};
use crate::error::ApiError;
use crate::model::{
    ApiRequest, ApiResponse, DEFAULT_OBJECT_CONTENT_TYPE, DEFAULT_UPLOAD_CONTENT_TYPE,
    QueueMessage, SendMessageInput, StoredObject, UploadFileInput,
};
use crate::operations::ApiOperation;
use crate::router::resolve_operation;

const MSG_NOT_FOUND: &str = "404 Not Found";
const MSG_FILE_NAME_REQUIRED: &str = "File name is required";
const MSG_FILE_NAME_INVALID: &str = "File name must be valid UTF-8 after percent-decoding";
const MSG_FILE_NOT_FOUND: &str = "File not found";
const MSG_EMPTY_BODY: &str = "Request body is empty";
const MSG_INVALID_BODY: &str = "Request body must be a JSON object";
const MSG_UPLOAD_FIELDS_REQUIRED: &str = "fileName and content fields are required";
const MSG_UPLOADED: &str = "File uploaded";
const MSG_UPLOAD_FAILED: &str = "Failed to upload file";
const MSG_QUEUE_DISABLED: &str = "Queue feature is not enabled";
const MSG_MESSAGE_REQUIRED: &str = "message field is required";
const MSG_SENT: &str = "Message sent to queue";
const MSG_SEND_FAILED: &str = "Failed to send message";

/// A configured queue: the client plus the queue it sends to.
struct QueueBinding {
    client: Arc<dyn MessageQueue>,
    queue_url: String,
}

/// Routes HTTP-shaped requests to object-store and queue operations.
pub struct ApiRouter {
    object_store: Arc<dyn ObjectStore>,
    bucket_name: String,
    queue: Option<QueueBinding>,
}

impl fmt::Debug for ApiRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRouter")
            .field("object_store", &"...")
            .field("bucket_name", &self.bucket_name)
            .field("queue_url", &self.queue.as_ref().map(|q| q.queue_url.as_str()))
            .finish()
    }
}

impl ApiRouter {
    /// Create a router with object storage only. The queue operation answers
    /// 501 until [`with_queue`](Self::with_queue) is called.
    #[must_use]
    pub fn new(object_store: Arc<dyn ObjectStore>, bucket_name: impl Into<String>) -> Self {
        Self {
            object_store,
            bucket_name: bucket_name.into(),
            queue: None,
        }
    }

    /// Enable the queue operation.
    #[must_use]
    pub fn with_queue(
        mut self,
        client: Arc<dyn MessageQueue>,
        queue_url: impl Into<String>,
    ) -> Self {
        self.queue = Some(QueueBinding {
            client,
            queue_url: queue_url.into(),
        });
        self
    }

    /// Whether a queue is configured.
    #[must_use]
    pub fn queue_enabled(&self) -> bool {
        self.queue.is_some()
    }

    /// The bucket objects are read from and written to.
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Handle one request. Never fails; errors become structured responses.
    pub async fn handle(&self, req: ApiRequest) -> ApiResponse {
        let op = resolve_operation(&req.method, &req.path);
        debug!(method = %req.method, path = %req.path, operation = %op, "dispatching request");

        let result = match op {
            ApiOperation::GetFile { key } => self.handle_get_file(&key).await,
            ApiOperation::InvalidKey => Err(ApiError::bad_request(MSG_FILE_NAME_INVALID)),
            ApiOperation::UploadFile => self.handle_upload_file(req.body.as_deref()).await,
            ApiOperation::SendMessage => self.handle_send_message(req.body.as_deref()).await,
            ApiOperation::NotFound => Err(ApiError::not_found(MSG_NOT_FOUND)),
        };

        result.unwrap_or_else(|err| {
            debug!(status = %err.status_code, error = %err, "request failed");
            err.to_response()
        })
    }

    /// `GET /api/files/{key}`: return the object body verbatim.
    pub async fn handle_get_file(&self, key: &str) -> Result<ApiResponse, ApiError> {
        if key.is_empty() {
            return Err(ApiError::bad_request(MSG_FILE_NAME_REQUIRED));
        }

        let object = self
            .object_store
            .get_object(&self.bucket_name, key)
            .await
            .map_err(|e| {
                warn!(bucket = %self.bucket_name, key, error = %e, "failed to read object");
                ApiError::not_found(MSG_FILE_NOT_FOUND).with_source(e)
            })?;

        let content_type = object
            .content_type
            .as_deref()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_OBJECT_CONTENT_TYPE);

        Ok(ApiResponse::raw(
            http::StatusCode::OK,
            content_type,
            object.content,
        ))
    }

    /// `POST /api/files`: store `content` under `fileName`.
    pub async fn handle_upload_file(&self, body: Option<&str>) -> Result<ApiResponse, ApiError> {
        let input: UploadFileInput = parse_body(body)?;
        let object = validate_upload(input)?;
        let file_name = object.key.clone();

        self.object_store
            .put_object(&self.bucket_name, object)
            .await
            .map_err(|e| {
                warn!(
                    bucket = %self.bucket_name,
                    key = %file_name,
                    error = %e,
                    "failed to write object"
                );
                ApiError::internal(MSG_UPLOAD_FAILED).with_source(e)
            })?;

        debug!(bucket = %self.bucket_name, key = %file_name, "object stored");
        Ok(ApiResponse::json(
            http::StatusCode::OK,
            &json!({ "message": MSG_UPLOADED, "fileName": file_name }),
        ))
    }

    /// `POST /api/queue`: enqueue `message` as JSON text.
    pub async fn handle_send_message(&self, body: Option<&str>) -> Result<ApiResponse, ApiError> {
        let Some(queue) = &self.queue else {
            return Err(ApiError::not_enabled(MSG_QUEUE_DISABLED));
        };

        let input: SendMessageInput = parse_body(body)?;
        let message = input
            .message
            .ok_or_else(|| ApiError::bad_request(MSG_MESSAGE_REQUIRED))?;

        let message = QueueMessage {
            body: message.to_string(),
        };
        let message_id = queue
            .client
            .send_message(&queue.queue_url, message)
            .await
            .map_err(|e| {
                warn!(queue_url = %queue.queue_url, error = %e, "failed to send message");
                ApiError::internal(MSG_SEND_FAILED).with_source(e)
            })?;

        debug!(queue_url = %queue.queue_url, message_id = %message_id, "message sent");
        Ok(ApiResponse::json(
            http::StatusCode::OK,
            &json!({ "message": MSG_SENT }),
        ))
    }
}

/// Parse a request body into a typed input.
///
/// The body must be present, non-empty, and a JSON object. Field presence is
/// checked by the caller.
fn parse_body<T: DeserializeOwned>(body: Option<&str>) -> Result<T, ApiError> {
    let body = body
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(MSG_EMPTY_BODY))?;

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ApiError::bad_request(MSG_INVALID_BODY).with_source(e))?;
    if !value.is_object() {
        return Err(ApiError::bad_request(MSG_INVALID_BODY));
    }

    serde_json::from_value(value)
        .map_err(|e| ApiError::bad_request(MSG_INVALID_BODY).with_source(e))
}

/// Turn an upload body into the object to store. `fileName` and `content`
/// must both be present and non-empty.
fn validate_upload(input: UploadFileInput) -> Result<StoredObject, ApiError> {
    let (Some(file_name), Some(content)) = (input.file_name, input.content) else {
        return Err(ApiError::bad_request(MSG_UPLOAD_FIELDS_REQUIRED));
    };
    if file_name.is_empty() || content.is_empty() {
        return Err(ApiError::bad_request(MSG_UPLOAD_FIELDS_REQUIRED));
    }

    Ok(StoredObject {
        key: file_name,
        content: content.into(),
        content_type: Some(
            input
                .content_type
                .unwrap_or_else(|| DEFAULT_UPLOAD_CONTENT_TYPE.to_owned()),
        ),
    })
}
