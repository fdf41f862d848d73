//! WireMock server utilities for API testing

use super::fixtures::{TEST_LOGIN, TEST_SECRET};
use callfire_rest::api::RequestConfig;
use callfire_rest::config::Config;
use wiremock::MockServer;

pub const BASE_PATH: &str = "/api/1.1/rest";

/// Host and port of a running mock server, e.g. `127.0.0.1:40123`
pub fn mock_host(mock_server: &MockServer) -> String {
    mock_server.address().to_string()
}

/// Request config pointing at the mock server, without credentials
pub fn unauthenticated_config(mock_server: &MockServer) -> RequestConfig {
    RequestConfig::new(mock_host(mock_server), BASE_PATH).with_scheme("http")
}

/// Request config pointing at the mock server with test credentials set
pub fn authenticated_config(mock_server: &MockServer) -> RequestConfig {
    let mut config = unauthenticated_config(mock_server);
    config.set_auth(TEST_LOGIN, TEST_SECRET);
    config
}

/// Application config pointing at the mock server
pub fn app_config(mock_server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.scheme = "http".to_string();
    config.api.host = mock_host(mock_server);
    config.api.login = Some(TEST_LOGIN.to_string());
    config.api.secret = Some(TEST_SECRET.to_string());
    config.request.timeout_secs = 5;
    config
}

/// An address nothing is listening on
pub fn closed_port_host() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}
