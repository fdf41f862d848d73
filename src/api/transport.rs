//! Boundary between request construction and the HTTP stack.

use crate::api::types::Method;
use crate::error::{RestError, RestResult};
use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// A fully prepared request, ready to hand to a [`Transport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    /// `login:secret`, sent as HTTP Basic credentials
    pub auth: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl TransportRequest {
    /// Create Authorization header for HTTP Basic Auth
    pub fn authorization_header(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.auth);
        format!("Basic {}", encoded)
    }
}

/// Status, headers and a body stream delivered as chunks arrive
pub struct TransportResponse {
    pub status: u16,
    pub version: String,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: BoxStream<'static, RestResult<Bytes>>,
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("version", &self.version)
            .field("content_type", &self.content_type)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Something that can send a request and stream back the response
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> RestResult<TransportResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport. `timeout` bounds the whole request including the
    /// body; `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> RestResult<Self> {
        let mut builder = Client::builder().pool_max_idle_per_host(10);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RestError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: TransportRequest) -> RestResult<TransportResponse> {
        let mut builder = self
            .client
            .request(request.method.as_reqwest(), &request.url)
            .header(AUTHORIZATION, request.authorization_header());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let version = format!("{:?}", response.version());
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(RestError::from))
            .boxed();

        Ok(TransportResponse {
            status,
            version,
            content_type,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header() {
        let request = TransportRequest {
            method: Method::Get,
            url: "https://www.callfire.com/api/1.1/rest/call".to_string(),
            auth: "SECRET_LOGIN:BIG_SECRET".to_string(),
            headers: BTreeMap::new(),
            body: None,
        };
        assert_eq!(
            request.authorization_header(),
            "Basic U0VDUkVUX0xPR0lOOkJJR19TRUNSRVQ="
        );
    }

    #[test]
    fn test_transport_creation() {
        assert!(HttpTransport::new(Some(Duration::from_secs(5))).is_ok());
        assert!(HttpTransport::new(None).is_ok());
    }
}
