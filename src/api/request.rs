use crate::api::params::Params;
use crate::api::types::Method;
use crate::config::ApiConfig;
use std::collections::BTreeMap;

pub const DEFAULT_HOST: &str = "www.callfire.com";
pub const DEFAULT_PATH: &str = "/api/1.1/rest";
pub const DEFAULT_SCHEME: &str = "https";

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Target configuration for requests against the REST API.
///
/// Callers mutate this through the setters. Dispatching works on a clone,
/// so a config can be shared between concurrent requests.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    host: String,
    scheme: String,
    base_path: String,
    query: String,
    auth: String,
    method: Method,
    headers: BTreeMap<String, String>,
    debug: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PATH)
    }
}

impl RequestConfig {
    pub fn new(host: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            scheme: DEFAULT_SCHEME.to_string(),
            base_path: base_path.into(),
            query: String::new(),
            auth: String::new(),
            method: Method::Get,
            headers: BTreeMap::new(),
            debug: false,
        }
    }

    /// Use a scheme other than https, e.g. for a local test server
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Build from application configuration. Credentials are applied only
    /// when both login and secret are present.
    pub fn from_api_config(api: &ApiConfig) -> Self {
        let mut config = Self::new(api.host.clone(), api.path.clone()).with_scheme(api.scheme.clone());
        if let (Some(login), Some(secret)) = (&api.login, &api.secret) {
            config.set_auth(login, secret);
        }
        config
    }

    /// Set the credentials sent with every request
    pub fn set_auth(&mut self, login: &str, secret: &str) {
        self.auth = format!("{}:{}", login, secret);
    }

    /// Add a suffix to the current path
    pub fn append_path(&mut self, suffix: &str) {
        self.base_path.push_str(suffix);
    }

    pub fn enable_debugging(&mut self) {
        self.debug = true;
    }

    /// Build the `?`-prefixed query string for `data`
    pub fn build_endpoint(&self, data: &Params) -> String {
        data.to_endpoint()
    }

    /// Store the headers describing a form-encoded body of `data`
    pub fn build_form_headers(&mut self, data: &Params) {
        let length = data.encode().len();
        self.headers
            .insert(CONTENT_TYPE.to_string(), FORM_URLENCODED.to_string());
        self.headers
            .insert(CONTENT_LENGTH.to_string(), length.to_string());
    }

    pub(crate) fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    pub(crate) fn set_query(&mut self, query: String) {
        self.query = query;
    }

    /// Full URL of the current path
    pub fn url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.base_path)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn path(&self) -> &str {
        &self.base_path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn auth(&self) -> &str {
        &self.auth
    }

    pub fn has_auth(&self) -> bool {
        !self.auth.is_empty()
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broadcast_query() -> Params {
        Params::new()
            .with("MaxResults", 10)
            .with("FromNumber", "2092084589")
            .with("ToNumber", "2092084589")
            .with("LabelName", "TestBroadcast")
            .with("State", "FINISHED")
    }

    #[test]
    fn test_default_config() {
        let config = RequestConfig::default();
        assert_eq!(config.host(), "www.callfire.com");
        assert_eq!(config.path(), "/api/1.1/rest");
        assert_eq!(config.scheme(), "https");
        assert_eq!(config.auth(), "");
        assert_eq!(config.query(), "");
        assert_eq!(config.method(), Method::Get);
        assert!(config.headers().is_empty());
        assert!(!config.has_auth());
    }

    #[test]
    fn test_append_path() {
        let mut config = RequestConfig::default();
        config.append_path("/call/");
        assert_eq!(config.path(), "/api/1.1/rest/call/");

        config.append_path("");
        assert_eq!(config.path(), "/api/1.1/rest/call/");
    }

    #[test]
    fn test_enable_debugging() {
        let mut config = RequestConfig::default();
        assert!(!config.is_debug_enabled());
        config.enable_debugging();
        assert!(config.is_debug_enabled());
    }

    #[test]
    fn test_set_auth() {
        let mut config = RequestConfig::default();
        config.set_auth("SECRET_LOGIN", "BIG_SECRET");
        assert_eq!(config.auth(), "SECRET_LOGIN:BIG_SECRET");
        assert!(config.has_auth());
    }

    #[test]
    fn test_build_endpoint() {
        let config = RequestConfig::default();
        assert_eq!(
            config.build_endpoint(&broadcast_query()),
            "?MaxResults=10&FromNumber=2092084589&ToNumber=2092084589&LabelName=TestBroadcast&State=FINISHED"
        );
    }

    #[test]
    fn test_build_form_headers() {
        let mut config = RequestConfig::default();
        let data = broadcast_query();
        config.build_form_headers(&data);

        assert_eq!(
            config.headers().get(CONTENT_TYPE).map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            config.headers().get(CONTENT_LENGTH),
            Some(&data.encode().len().to_string())
        );
    }

    #[test]
    fn test_form_headers_count_bytes_not_chars() {
        let mut config = RequestConfig::default();
        let data = Params::new().with("Message", "héllo");
        config.build_form_headers(&data);
        // "é" encodes to %C3%A9
        assert_eq!(
            config.headers().get(CONTENT_LENGTH).map(String::as_str),
            Some("18")
        );
    }

    #[test]
    fn test_url() {
        let mut config = RequestConfig::new("127.0.0.1:8080", "/api").with_scheme("http");
        config.append_path("/call");
        assert_eq!(config.url(), "http://127.0.0.1:8080/api/call");
    }

    #[test]
    fn test_from_api_config() {
        let api = ApiConfig {
            login: Some("user".to_string()),
            secret: Some("pass".to_string()),
            ..ApiConfig::default()
        };
        let config = RequestConfig::from_api_config(&api);
        assert_eq!(config.auth(), "user:pass");
        assert_eq!(config.url(), "https://www.callfire.com/api/1.1/rest");

        let partial = ApiConfig {
            login: Some("user".to_string()),
            ..ApiConfig::default()
        };
        assert!(!RequestConfig::from_api_config(&partial).has_auth());
    }
}
