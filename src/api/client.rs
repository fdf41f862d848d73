use crate::api::params::Params;
use crate::api::request::RequestConfig;
use crate::api::transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
use crate::api::types::{DispatchOutcome, Method, ResponseBodyPolicy};
use crate::config::RequestSettings;
use crate::error::{RestError, RestResult};
use crate::metrics::DispatchMetrics;

use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, instrument, warn};

/// Dispatches requests described by a [`RequestConfig`] and streams the
/// responses to a sink.
pub struct RestClient<T: Transport = HttpTransport> {
    transport: T,
    body_policy: ResponseBodyPolicy,
    metrics: Arc<DispatchMetrics>,
}

impl RestClient<HttpTransport> {
    /// Create a client with the default reqwest transport
    pub fn new() -> RestResult<Self> {
        Self::from_settings(&RequestSettings::default(), Arc::new(DispatchMetrics::new()))
    }

    pub fn from_settings(
        settings: &RequestSettings,
        metrics: Arc<DispatchMetrics>,
    ) -> RestResult<Self> {
        let timeout = (settings.timeout_secs > 0).then(|| Duration::from_secs(settings.timeout_secs));
        let transport = HttpTransport::new(timeout)?;
        Ok(Self::with_transport(transport, metrics).with_body_policy(settings.body_policy))
    }
}

impl<T: Transport> RestClient<T> {
    pub fn with_transport(transport: T, metrics: Arc<DispatchMetrics>) -> Self {
        Self {
            transport,
            body_policy: ResponseBodyPolicy::default(),
            metrics,
        }
    }

    pub fn with_body_policy(mut self, body_policy: ResponseBodyPolicy) -> Self {
        self.body_policy = body_policy;
        self
    }

    pub fn body_policy(&self) -> ResponseBodyPolicy {
        self.body_policy
    }

    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Derive the per-call snapshot of `config` and the request to send.
    ///
    /// Fails with [`RestError::Authentication`] when no credentials are set.
    /// The caller's config is never modified.
    pub fn prepare_request(
        &self,
        config: &RequestConfig,
        data: &Params,
        method: Method,
    ) -> RestResult<(RequestConfig, TransportRequest)> {
        if !config.has_auth() {
            return Err(RestError::Authentication(
                "call set_auth before dispatching".to_string(),
            ));
        }

        let mut snapshot = config.clone();
        let (headers, body) = if method.has_body() {
            snapshot.set_method(method);
            snapshot.build_form_headers(data);
            let body = (!data.is_empty()).then(|| data.encode());
            (snapshot.headers().clone(), body)
        } else {
            let endpoint = snapshot.build_endpoint(data);
            snapshot.append_path(&endpoint);
            snapshot.set_query(endpoint);
            (BTreeMap::new(), None)
        };

        let request = TransportRequest {
            method,
            url: snapshot.url(),
            auth: snapshot.auth().to_string(),
            headers,
            body,
        };
        Ok((snapshot, request))
    }

    /// Send one request and stream its response body into `sink`.
    ///
    /// GET requests carry `data` as a query string. POST, PUT and DELETE
    /// send it as a form-encoded body.
    #[instrument(skip(self, config, data, sink), fields(api_op = "dispatch", method = %method))]
    pub async fn dispatch<W>(
        &self,
        config: &RequestConfig,
        data: &Params,
        method: Method,
        sink: &mut W,
    ) -> RestResult<DispatchOutcome>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let (snapshot, request) = match self.prepare_request(config, data, method) {
            Ok(prepared) => prepared,
            Err(e) => {
                self.metrics.record_auth_rejection();
                warn!(api_op = "dispatch", error = %e, "Refusing to dispatch");
                return Err(e);
            }
        };

        let verbose = snapshot.is_debug_enabled();
        log_request(&request, verbose);

        let url = request.url.clone();
        self.metrics.record_request(&url);
        let start = Instant::now();

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(api_op = "dispatch", url = %url, error = %e, "Request failed");
                self.metrics.record_failure(&url, &e.to_string());
                return Err(e);
            }
        };

        let TransportResponse {
            status,
            version,
            content_type,
            headers,
            mut body,
        } = response;

        if method.has_body() {
            info!(api_op = "dispatch", "Request is: {}", snapshot.method());
            info!(api_op = "dispatch", status, "{} {}", version, status);
            info!(
                api_op = "dispatch",
                "Content-Type: {}",
                content_type.as_deref().unwrap_or("none")
            );
        } else {
            debug!(api_op = "dispatch", status, "{} {}", version, status);
        }

        for (name, value) in &headers {
            if verbose {
                info!(api_op = "response_header", "{}: {}", name, value);
            } else {
                debug!(api_op = "response_header", "{}: {}", name, value);
            }
        }

        let body_streamed = self.body_policy.should_stream(method, !data.is_empty());
        let mut bytes_streamed = 0u64;
        if body_streamed {
            if let Err(e) = forward_body(&mut body, sink, &mut bytes_streamed).await {
                error!(
                    api_op = "dispatch",
                    url = %url,
                    bytes_streamed,
                    error = %e,
                    "Response stream failed"
                );
                self.metrics.record_failure(&url, &e.to_string());
                return Err(e);
            }
        }

        self.metrics
            .record_success(&url, bytes_streamed, start.elapsed());

        Ok(DispatchOutcome {
            method,
            url,
            status,
            version,
            content_type,
            bytes_streamed,
            body_streamed,
        })
    }

    /// Shorthand for a GET dispatch
    pub async fn get<W>(
        &self,
        config: &RequestConfig,
        data: &Params,
        sink: &mut W,
    ) -> RestResult<DispatchOutcome>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.dispatch(config, data, Method::Get, sink).await
    }
}

/// Copy body chunks into `sink` as they arrive, then flush it.
async fn forward_body<W>(
    body: &mut BoxStream<'static, RestResult<Bytes>>,
    sink: &mut W,
    bytes_streamed: &mut u64,
) -> RestResult<()>
where
    W: AsyncWrite + Unpin + Send,
{
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        sink.write_all(&chunk).await?;
        *bytes_streamed += chunk.len() as u64;
    }
    sink.flush().await?;
    Ok(())
}

fn log_request(request: &TransportRequest, verbose: bool) {
    if verbose {
        info!(api_op = "dispatch", method = %request.method, url = %request.url, "Sending request");
        for (name, value) in &request.headers {
            info!(api_op = "request_header", "{}: {}", name, value);
        }
    } else {
        debug!(api_op = "dispatch", method = %request.method, url = %request.url, "Sending request");
    }
}
