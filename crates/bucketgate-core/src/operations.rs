//! Facade operation enum.

use std::fmt;

/// The operation a request resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Read one object. `key` is percent-decoded and may be empty, which the
    /// operation rejects.
    GetFile {
        /// Final path segment.
        key: String,
    },
    /// A read whose key does not percent-decode to UTF-8.
    InvalidKey,
    /// Write one object from a JSON body.
    UploadFile,
    /// Enqueue one message from a JSON body.
    SendMessage,
    /// No route matched.
    NotFound,
}

impl ApiOperation {
    /// Returns the operation name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetFile { .. } => "GetFile",
            Self::InvalidKey => "InvalidKey",
            Self::UploadFile => "UploadFile",
            Self::SendMessage => "SendMessage",
            Self::NotFound => "NotFound",
        }
    }
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
