//! Gateway configuration.
//!
//! All configuration is driven by environment variables. Values are resolved
//! once at startup; the facade never reads the environment afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default request body limit: 6 MiB, the synchronous Lambda payload cap.
pub const DEFAULT_MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// Which capability implementations back the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// S3 and SQS through the AWS SDK.
    #[default]
    Aws,
    /// Process-local maps. Not durable.
    Memory,
}

impl Backend {
    /// Returns the lowercase backend name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(Self::Aws),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_owned())),
        }
    }
}

/// Configuration errors detected at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `BACKEND` named something other than `aws` or `memory`.
    #[error("unknown backend: {0} (expected \"aws\" or \"memory\")")]
    UnknownBackend(String),

    /// A required variable was missing or empty.
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    /// A variable was set to a value that does not parse.
    #[error("invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Gateway configuration.
///
/// # Examples
///
/// ```
/// use bucketgate_core::config::GatewayConfig;
///
/// let config = GatewayConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:8080");
/// assert!(!config.queue_enabled());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Bind address for the HTTP front door.
    #[builder(default = String::from("0.0.0.0:8080"))]
    pub gateway_listen: String,

    /// Bucket that holds uploaded objects.
    #[builder(default)]
    pub bucket_name: String,

    /// Queue URL. `None` disables the queue operation.
    #[builder(default)]
    pub queue_url: Option<String>,

    /// Region for the capability clients.
    #[builder(default = String::from("us-east-1"))]
    pub region: String,

    /// Endpoint override for the capability clients (e.g. a local emulator).
    #[builder(default)]
    pub endpoint_url: Option<String>,

    /// Capability implementations to use.
    #[builder(default)]
    pub backend: Backend,

    /// Log level filter string.
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Value of `access-control-allow-origin` on every response.
    #[builder(default = String::from("*"))]
    pub cors_allow_origin: String,

    /// Largest accepted request body, in bytes.
    #[builder(default = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:8080` |
    /// | `BUCKET_NAME` | *(empty)* |
    /// | `QUEUE_URL` | *(empty = queue disabled)* |
    /// | `AWS_REGION` | `us-east-1` |
    /// | `AWS_ENDPOINT_URL` | *(unset)* |
    /// | `BACKEND` | `aws` |
    /// | `LOG_LEVEL` | `info` |
    /// | `CORS_ALLOW_ORIGIN` | `*` |
    /// | `MAX_BODY_BYTES` | `6291456` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("BUCKET_NAME") {
            config.bucket_name = v;
        }
        config.queue_url = non_empty(lookup("QUEUE_URL"));
        if let Some(v) = non_empty(lookup("AWS_REGION")) {
            config.region = v;
        }
        config.endpoint_url = non_empty(lookup("AWS_ENDPOINT_URL"));
        if let Some(v) = non_empty(lookup("BACKEND")) {
            config.backend = v.parse()?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = non_empty(lookup("CORS_ALLOW_ORIGIN")) {
            config.cors_allow_origin = v;
        }
        if let Some(v) = non_empty(lookup("MAX_BODY_BYTES")) {
            config.max_body_bytes = v.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "MAX_BODY_BYTES",
                value: v.clone(),
            })?;
        }

        Ok(config)
    }

    /// Check that the configuration is usable for the selected backend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == Backend::Aws && self.bucket_name.trim().is_empty() {
            return Err(ConfigError::Missing("BUCKET_NAME"));
        }
        Ok(())
    }

    /// Whether the queue operation is available.
    #[must_use]
    pub fn queue_enabled(&self) -> bool {
        self.queue_url.is_some()
    }
}

/// Treat empty and whitespace-only values as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
