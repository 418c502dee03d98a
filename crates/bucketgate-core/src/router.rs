//! Request router.
//!
//! Routing is a method-qualified prefix match, first match wins:
//!
//! ```text
//! GET  /api/files/{key}  -> GetFile
//! POST /api/files        -> UploadFile
//! POST /api/queue        -> SendMessage
//! *                      -> NotFound
//! ```
//!
//! The prefix test is a plain string prefix, so `/api/filesX` is routed like
//! `/api/files`. Any other method on `/api/files` falls through to
//! `NotFound`.
//!
//! The object key is the final path segment, percent-decoded, so
//! `/api/files/my%20file.txt` reads `my file.txt`. A segment that does not
//! decode to UTF-8 resolves to `InvalidKey`.

use percent_encoding::percent_decode_str;

use crate::operations::ApiOperation;

/// Path prefix for object operations.
pub const FILES_PREFIX: &str = "/api/files";

/// Path prefix for the queue operation.
pub const QUEUE_PREFIX: &str = "/api/queue";

/// Resolve the operation for a method and path.
#[must_use]
pub fn resolve_operation(method: &http::Method, path: &str) -> ApiOperation {
    if path.starts_with(FILES_PREFIX) {
        return match *method {
            http::Method::GET => match decode_key(object_key(path)) {
                Some(key) => ApiOperation::GetFile { key },
                None => ApiOperation::InvalidKey,
            },
            http::Method::POST => ApiOperation::UploadFile,
            _ => ApiOperation::NotFound,
        };
    }

    if path.starts_with(QUEUE_PREFIX) && *method == http::Method::POST {
        return ApiOperation::SendMessage;
    }

    ApiOperation::NotFound
}

/// Extract the raw object key from a files path: its final `/`-separated
/// segment, still percent-encoded.
///
/// A bare `/api/files` has no trailing segment and yields an empty key.
#[must_use]
pub fn object_key(path: &str) -> &str {
    match path.strip_prefix(FILES_PREFIX) {
        Some("") => "",
        _ => path.rsplit('/').next().unwrap_or_default(),
    }
}

/// Percent-decode a raw key. `None` if the decoded bytes are not UTF-8.
#[must_use]
pub fn decode_key(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(std::borrow::Cow::into_owned)
}
