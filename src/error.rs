use std::fmt;
use thiserror::Error;

/// A single problem found while validating configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Unified error type for callfire-rest.
#[derive(Error, Debug, Clone)]
pub enum RestError {
    /// Credentials were not set before dispatching
    #[error("Authentication options not set: {0}")]
    Authentication(String),

    /// Connection, TLS or request failure reported by the transport
    #[error("Transport error: {0}")]
    Transport(String),

    /// Transport gave up waiting for the server
    #[error("Request timed out: {0}")]
    TimedOut(String),

    /// Output sink or config file I/O failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Invalid argument supplied by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration failed validation
    #[error("Validation error: {}", .0.iter().map(|i| i.to_string()).collect::<Vec<_>>().join("; "))]
    Validation(Vec<ValidationIssue>),

    /// Config file could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

impl RestError {
    /// Check if this error came from the transport rather than the caller
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, RestError::Transport(_) | RestError::TimedOut(_))
    }
}

// === Conversion Implementations ===

macro_rules! impl_from_error {
    ($err_type:ty, $arm:pat => $body:expr) => {
        impl From<$err_type> for RestError {
            fn from(err: $err_type) -> Self {
                match err {
                    $arm => $body,
                }
            }
        }
    };
}

impl_from_error!(std::io::Error, e => match e.kind() {
    std::io::ErrorKind::TimedOut => RestError::TimedOut(e.to_string()),
    std::io::ErrorKind::InvalidInput => RestError::InvalidArgument(e.to_string()),
    _ => RestError::Io(e.to_string()),
});

impl_from_error!(reqwest::Error, e => if e.is_timeout() {
    RestError::TimedOut(e.to_string())
} else if e.is_connect() {
    RestError::Transport(format!("Connection failed: {}", e))
} else {
    RestError::Transport(e.to_string())
});

impl_from_error!(serde_json::Error, e => RestError::Parse(e.to_string()));
impl_from_error!(toml::de::Error, e => RestError::Parse(e.to_string()));

/// Result type alias for operations that can fail with RestError.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transport_failure() {
        assert!(RestError::Transport("refused".to_string()).is_transport_failure());
        assert!(RestError::TimedOut("slow".to_string()).is_transport_failure());

        assert!(!RestError::Authentication("empty".to_string()).is_transport_failure());
        assert!(!RestError::Io("closed".to_string()).is_transport_failure());
        assert!(!RestError::InvalidArgument("bad".to_string()).is_transport_failure());
    }

    #[test]
    fn test_io_error_conversion() {
        let err: RestError = std::io::Error::new(std::io::ErrorKind::TimedOut, "t").into();
        assert!(matches!(err, RestError::TimedOut(_)));

        let err: RestError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe").into();
        assert!(matches!(err, RestError::Io(_)));
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: RestError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, RestError::Parse(_)));
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(
            format!("{}", RestError::Authentication("call set_auth first".to_string())),
            "Authentication options not set: call set_auth first"
        );

        let err = RestError::Validation(vec![
            ValidationIssue {
                field: "api.host".to_string(),
                message: "Host cannot be empty".to_string(),
            },
            ValidationIssue {
                field: "logging.level".to_string(),
                message: "Invalid log level".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Validation error: api.host: Host cannot be empty; logging.level: Invalid log level"
        );
    }
}
