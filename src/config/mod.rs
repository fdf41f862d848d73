//! Configuration management for CLI, environment variables, and config files.

use crate::api::request::{DEFAULT_HOST, DEFAULT_PATH, DEFAULT_SCHEME};
use crate::api::types::ResponseBodyPolicy;
use crate::error::{RestError, ValidationIssue};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for callfire-rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub request: RequestSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Target API and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub scheme: String,
    pub host: String,
    pub path: String,
    pub login: Option<String>,
    pub secret: Option<String>,
}

/// Per-request behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSettings {
    /// Whole-request timeout in seconds, 0 disables it
    pub timeout_secs: u64,
    pub body_policy: ResponseBodyPolicy,
    pub debug: bool,
}

/// Configuration for logging output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            path: DEFAULT_PATH.to_string(),
            login: None,
            secret: None,
        }
    }
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            body_policy: ResponseBodyPolicy::Always,
            debug: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

const MAX_TIMEOUT_SECS: u64 = 3600;

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self, RestError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RestError::Io(format!("{}: {}", path.display(), e)))?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Ok(toml::from_str(&content)?),
        }
    }

    pub fn from_default_locations() -> Result<Self, RestError> {
        let config_paths = [
            dirs::config_dir().map(|d| d.join("callfire-rest/config.toml")),
            Some(PathBuf::from("/etc/callfire-rest/config.toml")),
            Some(PathBuf::from("./callfire-rest.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }

    pub fn merge_from_env(mut self) -> Result<Self, RestError> {
        if let Ok(val) = std::env::var("CALLFIRE_HOST") {
            self.api.host = val;
        }
        if let Ok(val) = std::env::var("CALLFIRE_SCHEME") {
            self.api.scheme = val;
        }
        if let Ok(val) = std::env::var("CALLFIRE_PATH") {
            self.api.path = val;
        }
        if let Ok(val) = std::env::var("CALLFIRE_TIMEOUT") {
            if val.is_empty() || !val.chars().all(|c| c.is_ascii_digit()) {
                return Err(RestError::InvalidArgument(
                    "CALLFIRE_TIMEOUT has invalid format".into(),
                ));
            }
            self.request.timeout_secs = val.parse().map_err(|_| {
                RestError::InvalidArgument("CALLFIRE_TIMEOUT has invalid format".into())
            })?;
        }
        if let Ok(val) = std::env::var("CALLFIRE_DEBUG") {
            self.request.debug = match val.to_ascii_lowercase().as_str() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => {
                    return Err(RestError::InvalidArgument(
                        "CALLFIRE_DEBUG must be true, false, 1 or 0".into(),
                    ))
                }
            };
        }
        if let Ok(val) = std::env::var("CALLFIRE_LOG_LEVEL") {
            self.logging.level = val;
        }

        // Credentials - the combined form wins over individual fields
        if let Ok(auth_str) = std::env::var("CALLFIRE_AUTH") {
            let (login, secret) = auth_str.split_once(':').ok_or_else(|| {
                RestError::InvalidArgument("CALLFIRE_AUTH must be login:secret".to_string())
            })?;
            self.api.login = Some(login.to_string());
            self.api.secret = Some(secret.to_string());
        } else {
            if let Ok(val) = std::env::var("CALLFIRE_LOGIN") {
                self.api.login = Some(val);
            }
            if let Ok(val) = std::env::var("CALLFIRE_SECRET") {
                self.api.secret = Some(val);
            }
        }

        Ok(self)
    }

    pub fn merge_from_cli(mut self, cli: &CliArgs) -> Self {
        if let Some(ref scheme) = cli.scheme {
            self.api.scheme = scheme.clone();
        }
        if let Some(ref host) = cli.host {
            self.api.host = host.clone();
        }
        if let Some(ref path) = cli.path {
            self.api.path = path.clone();
        }
        if let Some(ref login) = cli.login {
            self.api.login = Some(login.clone());
        }
        if let Some(ref secret) = cli.secret {
            self.api.secret = Some(secret.clone());
        }
        if cli.debug {
            self.request.debug = true;
        }
        if cli.verbose {
            self.logging.level = "debug".to_string();
        }

        self
    }

    pub fn load() -> Result<Self, RestError> {
        Self::from_default_locations()?.merge_from_env()
    }

    pub fn load_with_cli(cli: &CliArgs) -> Result<Self, RestError> {
        let base = match cli.config_file {
            Some(ref path) => Self::from_file(path)?,
            None => Self::from_default_locations()?,
        };
        Ok(base.merge_from_env()?.merge_from_cli(cli))
    }

    pub fn validate(&self) -> Result<(), RestError> {
        let mut issues = Vec::new();

        if self.api.host.is_empty() {
            issues.push(ValidationIssue {
                field: "api.host".to_string(),
                message: "Host cannot be empty".to_string(),
            });
        } else if self.api.host.contains('/') {
            issues.push(ValidationIssue {
                field: "api.host".to_string(),
                message: format!("Host '{}' must not contain a path", self.api.host),
            });
        }

        if !matches!(self.api.scheme.as_str(), "http" | "https") {
            issues.push(ValidationIssue {
                field: "api.scheme".to_string(),
                message: format!("Unsupported scheme '{}'", self.api.scheme),
            });
        }

        if !self.api.path.is_empty() && !self.api.path.starts_with('/') {
            issues.push(ValidationIssue {
                field: "api.path".to_string(),
                message: "Path must start with '/'".to_string(),
            });
        }

        if self.request.timeout_secs > MAX_TIMEOUT_SECS {
            issues.push(ValidationIssue {
                field: "request.timeout_secs".to_string(),
                message: format!("Timeout cannot exceed {} seconds", MAX_TIMEOUT_SECS),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            issues.push(ValidationIssue {
                field: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(RestError::Validation(issues))
        }
    }
}

/// Command-line arguments that override configuration values.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_file: Option<PathBuf>,
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub path: Option<String>,
    pub login: Option<String>,
    pub secret: Option<String>,
    pub debug: bool,
    pub verbose: bool,
}
