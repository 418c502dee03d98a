//! In-memory capabilities.
//!
//! Used as test doubles and for `BACKEND=memory` local runs. Nothing here is
//! durable; state lives as long as the process.

use std::collections::VecDeque;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::capability::{MessageQueue, ObjectStore};
use crate::error::CapabilityError;
use crate::model::{QueueMessage, StoredObject};

/// Object store backed by a concurrent map keyed by `(bucket, key)`.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: DashMap<(String, String), StoredObject>,
}

impl InMemoryObjectStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, CapabilityError> {
        self.objects
            .get(&(bucket.to_owned(), key.to_owned()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CapabilityError::NotFound {
                key: key.to_owned(),
            })
    }

    async fn put_object(&self, bucket: &str, object: StoredObject) -> Result<(), CapabilityError> {
        self.objects
            .insert((bucket.to_owned(), object.key.clone()), object);
        Ok(())
    }
}

/// A message recorded by [`InMemoryQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMessage {
    /// Queue the message was sent to.
    pub queue_url: String,
    /// Assigned message ID.
    pub message_id: String,
    /// The message itself.
    pub message: QueueMessage,
}

/// Number of messages [`InMemoryQueue::new`] retains.
pub const DEFAULT_RETAINED_MESSAGES: usize = 1000;

/// Queue that records the messages it is given, in order.
///
/// Nothing consumes the messages, so only the most recent `retain` are kept;
/// older ones are dropped as new ones arrive.
#[derive(Debug)]
pub struct InMemoryQueue {
    messages: Mutex<VecDeque<RecordedMessage>>,
    retain: usize,
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETAINED_MESSAGES)
    }
}

impl InMemoryQueue {
    /// Create an empty queue keeping the last [`DEFAULT_RETAINED_MESSAGES`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty queue keeping at most `retain` messages (minimum 1).
    #[must_use]
    pub fn with_retention(retain: usize) -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
            retain: retain.max(1),
        }
    }

    /// Snapshot of the retained messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<RecordedMessage> {
        self.messages.lock().iter().cloned().collect()
    }
}

#[async_trait]
impl MessageQueue for InMemoryQueue {
    async fn send_message(
        &self,
        queue_url: &str,
        message: QueueMessage,
    ) -> Result<String, CapabilityError> {
        let message_id = uuid::Uuid::new_v4().to_string();
        let mut messages = self.messages.lock();
        if messages.len() == self.retain {
            messages.pop_front();
        }
        messages.push_back(RecordedMessage {
            queue_url: queue_url.to_owned(),
            message_id: message_id.clone(),
            message,
        });
        Ok(message_id)
    }
}
