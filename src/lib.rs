pub mod api;
pub mod config;
pub mod error;
pub mod metrics;

pub use api::{DispatchOutcome, Method, Params, RequestConfig, ResponseBodyPolicy, RestClient};
pub use config::{CliArgs, Config};
pub use error::{RestError, RestResult};
pub use metrics::DispatchMetrics;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::AsyncWrite;

/// One request to send: method, path suffixes and parameters.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub method: Method,
    pub path_suffixes: Vec<String>,
    pub params: Params,
}

/// Send a single request and write the response body to stdout.
pub async fn run(config: Config, invocation: Invocation) -> Result<DispatchOutcome> {
    let mut stdout = tokio::io::stdout();
    run_with_sink(config, invocation, &mut stdout).await
}

pub async fn run_with_sink<W>(
    config: Config,
    invocation: Invocation,
    sink: &mut W,
) -> Result<DispatchOutcome>
where
    W: AsyncWrite + Unpin + Send,
{
    tracing::info!(operation = "startup", message = "callfire-rest starting");
    tracing::debug!(
        scheme = %config.api.scheme,
        host = %config.api.host,
        path = %config.api.path,
        "Configuration loaded"
    );

    config.validate().context("Invalid configuration")?;

    let metrics = Arc::new(DispatchMetrics::new());
    let client = RestClient::from_settings(&config.request, Arc::clone(&metrics))
        .context("Failed to create HTTP client")?;

    let mut request = RequestConfig::from_api_config(&config.api);
    for suffix in &invocation.path_suffixes {
        request.append_path(suffix);
    }
    if config.request.debug {
        request.enable_debugging();
    }

    let result = client
        .dispatch(&request, &invocation.params, invocation.method, sink)
        .await;

    metrics.log_summary();

    result.context("Request dispatch failed")
}
