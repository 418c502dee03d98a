//! Capability traits for the external services the facade calls into.
//!
//! Each method performs exactly one call against the backing service. No
//! retries, caching, or batching happen at this layer; whatever the
//! underlying client does is all there is.

use async_trait::async_trait;

use crate::error::CapabilityError;
use crate::model::{QueueMessage, StoredObject};

/// Object storage: read and write whole objects by key.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Read the object stored under `key` in `bucket`.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, CapabilityError>;

    /// Write `object` into `bucket`, replacing any existing object.
    async fn put_object(&self, bucket: &str, object: StoredObject) -> Result<(), CapabilityError>;
}

/// Message queue: fire-and-forget submission.
#[async_trait]
pub trait MessageQueue: Send + Sync + 'static {
    /// Submit `message` to the queue at `queue_url`, returning the message ID.
    async fn send_message(
        &self,
        queue_url: &str,
        message: QueueMessage,
    ) -> Result<String, CapabilityError>;
}
