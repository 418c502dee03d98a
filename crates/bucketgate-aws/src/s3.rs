//! [`ObjectStore`] over Amazon S3.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use bucketgate_core::capability::ObjectStore;
use bucketgate_core::error::CapabilityError;
use bucketgate_core::model::StoredObject;

/// Object store backed by an S3 client.
///
/// The client is cheap to clone and safe to share across requests.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    /// Wrap an S3 client.
    #[must_use]
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, CapabilityError> {
        debug!(bucket, key, "GetObject");
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    CapabilityError::NotFound {
                        key: key.to_owned(),
                    }
                } else {
                    CapabilityError::service("GetObject", DisplayErrorContext(&e))
                }
            })?;

        let content_type = output.content_type().map(ToOwned::to_owned);
        let content = output
            .body
            .collect()
            .await
            .map_err(|e| CapabilityError::service("GetObject", e))?
            .into_bytes();

        Ok(StoredObject {
            key: key.to_owned(),
            content,
            content_type,
        })
    }

    async fn put_object(&self, bucket: &str, object: StoredObject) -> Result<(), CapabilityError> {
        debug!(bucket, key = %object.key, size = object.content.len(), "PutObject");
        self.client
            .put_object()
            .bucket(bucket)
            .key(object.key)
            .body(ByteStream::from(object.content))
            .set_content_type(object.content_type)
            .send()
            .await
            .map_err(|e| CapabilityError::service("PutObject", DisplayErrorContext(&e)))?;
        Ok(())
    }
}
