//! bucketgate server - JSON gateway in front of an S3 bucket and an SQS queue.
//!
//! Serves three endpoints:
//!
//! - `GET /api/files/{key}` returns the stored object.
//! - `POST /api/files` stores `{"fileName", "content", "contentType"?}`.
//! - `POST /api/queue` enqueues `{"message"}` when a queue is configured.
//!
//! # Usage
//!
//! ```text
//! BUCKET_NAME=my-bucket QUEUE_URL=https://sqs... bucketgate-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `BUCKET_NAME` | *(required for `aws`)* | Bucket for file reads and writes |
//! | `QUEUE_URL` | *(unset = queue disabled)* | Queue for `/api/queue` |
//! | `AWS_REGION` | `us-east-1` | Region for the AWS clients |
//! | `AWS_ENDPOINT_URL` | *(unset)* | Endpoint override (S3/SQS emulator) |
//! | `BACKEND` | `aws` | `aws` or `memory` |
//! | `CORS_ALLOW_ORIGIN` | `*` | `access-control-allow-origin` value |
//! | `MAX_BODY_BYTES` | `6291456` | Largest accepted request body |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bucketgate_aws::{S3ObjectStore, SqsMessageQueue};
use bucketgate_core::memory::{InMemoryObjectStore, InMemoryQueue};
use bucketgate_core::{ApiRouter, Backend, GatewayConfig};
use bucketgate_http::{GatewayHttpConfig, GatewayHttpService};

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the [`ApiRouter`] for the configured backend.
async fn build_router(config: &GatewayConfig) -> ApiRouter {
    match config.backend {
        Backend::Aws => {
            let sdk_config =
                bucketgate_aws::load_sdk_config(&config.region, config.endpoint_url.as_deref())
                    .await;
            let s3 = bucketgate_aws::s3_client(&sdk_config, config.endpoint_url.is_some());
            let router = ApiRouter::new(Arc::new(S3ObjectStore::new(s3)), &config.bucket_name);
            match &config.queue_url {
                Some(url) => {
                    let sqs = bucketgate_aws::sqs_client(&sdk_config);
                    router.with_queue(Arc::new(SqsMessageQueue::new(sqs)), url)
                }
                None => router,
            }
        }
        Backend::Memory => {
            warn!("using in-memory backend, data is lost on exit");
            let router = ApiRouter::new(Arc::new(InMemoryObjectStore::new()), &config.bucket_name);
            match &config.queue_url {
                Some(url) => router.with_queue(Arc::new(InMemoryQueue::new()), url),
                None => router,
            }
        }
    }
}

/// Build the [`GatewayHttpConfig`] from the application [`GatewayConfig`].
fn build_http_config(config: &GatewayConfig) -> GatewayHttpConfig {
    GatewayHttpConfig {
        cors_allow_origin: config.cors_allow_origin.clone(),
        max_body_bytes: config.max_body_bytes,
    }
}

/// Resolve when Ctrl-C or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("received shutdown signal, draining connections");
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: GatewayHttpService) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Perform a health check by connecting to the gateway and requesting `/health`.
///
/// Succeeds if the response is 200 OK and reports the server as running.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if is_healthy_response(&response) {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

fn is_healthy_response(response: &str) -> bool {
    response.contains("200 OK") && response.contains("\"running\"")
}

/// Address to dial for `--health-check`: a wildcard bind becomes loopback.
fn health_check_addr(listen_addr: &str) -> String {
    listen_addr.replace("0.0.0.0", "127.0.0.1")
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::from_env().context("invalid configuration")?;

    // Handle --health-check flag used by container health checks.
    if std::env::args().any(|a| a == "--health-check") {
        let addr = health_check_addr(&config.gateway_listen);
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&config.log_level)?;
    config.validate().context("invalid configuration")?;

    let router = build_router(&config).await;
    let service = GatewayHttpService::new(Arc::new(router), build_http_config(&config));

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        %addr,
        backend = %config.backend,
        bucket = %config.bucket_name,
        queue_enabled = config.queue_enabled(),
        region = %config.region,
        version = VERSION,
        "starting bucketgate server",
    );

    serve(listener, service).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config(queue_url: Option<&str>) -> GatewayConfig {
        GatewayConfig::builder()
            .bucket_name("local".to_owned())
            .backend(Backend::Memory)
            .queue_url(queue_url.map(str::to_owned))
            .build()
    }

    #[test]
    fn test_should_build_memory_router_without_queue() {
        let router = tokio_test::block_on(build_router(&memory_config(None)));
        assert_eq!(router.bucket_name(), "local");
        assert!(!router.queue_enabled());
    }

    #[test]
    fn test_should_build_memory_router_with_queue() {
        let config = memory_config(Some("memory://jobs"));
        let router = tokio_test::block_on(build_router(&config));
        assert!(router.queue_enabled());
    }

    #[test]
    fn test_should_build_http_config_from_gateway_config() {
        let mut config = memory_config(None);
        config.cors_allow_origin = "https://app.example.com".to_owned();
        config.max_body_bytes = 2048;
        let http_config = build_http_config(&config);
        assert_eq!(http_config.cors_allow_origin, "https://app.example.com");
        assert_eq!(http_config.max_body_bytes, 2048);
    }

    #[test]
    fn test_should_rewrite_wildcard_health_check_addr() {
        assert_eq!(health_check_addr("0.0.0.0:8080"), "127.0.0.1:8080");
        assert_eq!(health_check_addr("10.0.0.5:9000"), "10.0.0.5:9000");
    }

    #[test]
    fn test_should_recognize_healthy_response() {
        let ok = concat!(
            "HTTP/1.1 200 OK\r\n",
            "content-type: application/json\r\n\r\n",
            r#"{"status":"running"}"#,
        );
        assert!(is_healthy_response(ok));
        let unhealthy = "HTTP/1.1 503 Service Unavailable\r\n\r\n";
        assert!(!is_healthy_response(unhealthy));
    }
}
