//! Integration tests for the bucketgate server.
//!
//! These tests require a running bucketgate server at `localhost:8080`.
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! BACKEND=memory BUCKET_NAME=local QUEUE_URL=memory://jobs bucketgate-server &
//! cargo test -p bucketgate-integration -- --ignored
//! ```
//!
//! The tests that read the bucket directly additionally need the server to
//! run with `BACKEND=aws` against an S3-compatible endpoint, exposed to the
//! tests through `S3_ENDPOINT_URL` and `BUCKET_NAME`.

use std::sync::Once;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use serde_json::Value;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL of the gateway under test.
#[must_use]
pub fn gateway_endpoint() -> String {
    std::env::var("GATEWAY_ENDPOINT").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// Build a full URL for `path` on the gateway.
#[must_use]
pub fn gateway_url(path: &str) -> String {
    format!("{}{path}", gateway_endpoint())
}

/// Create an HTTP client for talking to the gateway.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Fetch the health report and return whether the queue is enabled.
pub async fn queue_enabled(client: &reqwest::Client) -> bool {
    let health: Value = client
        .get(gateway_url("/health"))
        .send()
        .await
        .expect("health request")
        .json()
        .await
        .expect("health body");
    health["queue"] == "enabled"
}

/// Upload `content` under `file_name` and return the response.
pub async fn upload_file(
    client: &reqwest::Client,
    file_name: &str,
    content: &str,
    content_type: Option<&str>,
) -> reqwest::Response {
    let mut body = serde_json::json!({ "fileName": file_name, "content": content });
    if let Some(ct) = content_type {
        body["contentType"] = Value::from(ct);
    }
    client
        .post(gateway_url("/api/files"))
        .json(&body)
        .send()
        .await
        .expect("upload request")
}

/// Generate a unique object key for a test.
#[must_use]
pub fn test_file_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}.txt")
}

/// Create a configured S3 client pointing at the endpoint the gateway uses.
#[must_use]
pub fn s3_client() -> aws_sdk_s3::Client {
    init_tracing();

    let endpoint =
        std::env::var("S3_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_owned());
    let creds = Credentials::new("test", "test", None, None, "integration-test");

    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(creds)
        .endpoint_url(endpoint)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

/// Bucket the gateway writes to, as seen by the direct S3 tests.
#[must_use]
pub fn bucket_name() -> String {
    std::env::var("BUCKET_NAME").unwrap_or_else(|_| "bucketgate-test".to_owned())
}

mod test_files;
mod test_queue;
mod test_routing;
