use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// HTTP methods the helper knows how to dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether requests with this method carry a form-encoded body
    pub fn has_body(&self) -> bool {
        !matches!(self, Method::Get)
    }

    pub fn as_reqwest(&self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// When the response body of a POST, PUT or DELETE is forwarded to the sink.
///
/// GET responses are always streamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseBodyPolicy {
    /// Stream every response body
    #[default]
    Always,
    /// Only stream when the request itself carried form data
    WhenRequestHasData,
}

impl ResponseBodyPolicy {
    pub fn should_stream(&self, method: Method, request_has_data: bool) -> bool {
        match self {
            ResponseBodyPolicy::Always => true,
            ResponseBodyPolicy::WhenRequestHasData => !method.has_body() || request_has_data,
        }
    }
}

/// Summary of a completed dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub method: Method,
    pub url: String,
    pub status: u16,
    /// Protocol version as sent on the status line, e.g. `HTTP/1.1`
    pub version: String,
    pub content_type: Option<String>,
    pub bytes_streamed: u64,
    pub body_streamed: bool,
}

impl DispatchOutcome {
    pub fn status_line(&self) -> String {
        format!("{} {}", self.version, self.status)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
