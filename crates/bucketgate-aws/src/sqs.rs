//! [`MessageQueue`] over Amazon SQS.

use async_trait::async_trait;
use aws_sdk_sqs::error::DisplayErrorContext;
use tracing::debug;

use bucketgate_core::capability::MessageQueue;
use bucketgate_core::error::CapabilityError;
use bucketgate_core::model::QueueMessage;

/// Message queue backed by an SQS client.
#[derive(Debug, Clone)]
pub struct SqsMessageQueue {
    client: aws_sdk_sqs::Client,
}

impl SqsMessageQueue {
    /// Wrap an SQS client.
    #[must_use]
    pub fn new(client: aws_sdk_sqs::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageQueue for SqsMessageQueue {
    async fn send_message(
        &self,
        queue_url: &str,
        message: QueueMessage,
    ) -> Result<String, CapabilityError> {
        debug!(queue_url, size = message.body.len(), "SendMessage");
        let output = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(message.body)
            .send()
            .await
            .map_err(|e| CapabilityError::service("SendMessage", DisplayErrorContext(&e)))?;

        Ok(output.message_id().unwrap_or_default().to_owned())
    }
}
