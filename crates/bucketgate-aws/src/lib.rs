//! S3 and SQS capability implementations for bucketgate.
//!
//! Clients are built once at startup from a shared [`aws_config::SdkConfig`]
//! and reused for every request. Retries and timeouts are whatever the SDK
//! defaults provide.

pub mod s3;
pub mod sqs;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::info;

pub use s3::S3ObjectStore;
pub use sqs::SqsMessageQueue;

/// Load the shared SDK configuration.
///
/// Credentials come from the default provider chain. `endpoint_url`, when
/// set, points every client at an S3/SQS-compatible emulator.
pub async fn load_sdk_config(region: &str, endpoint_url: Option<&str>) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_owned()));
    if let Some(url) = endpoint_url {
        info!(endpoint_url = %url, "using endpoint override for AWS clients");
        loader = loader.endpoint_url(url);
    }
    loader.load().await
}

/// Build the S3 client.
///
/// Path-style addressing is forced when an endpoint override is in use, since
/// emulators rarely resolve virtual-hosted bucket names.
#[must_use]
pub fn s3_client(sdk_config: &SdkConfig, path_style: bool) -> aws_sdk_s3::Client {
    let config = aws_sdk_s3::config::Builder::from(sdk_config)
        .force_path_style(path_style)
        .build();
    aws_sdk_s3::Client::from_conf(config)
}

/// Build the SQS client.
#[must_use]
pub fn sqs_client(sdk_config: &SdkConfig) -> aws_sdk_sqs::Client {
    aws_sdk_sqs::Client::new(sdk_config)
}
