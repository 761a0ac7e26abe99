//! Error types shared across the Yandex Direct crates.
//!
//! Only local and transport failures are errors. Errors reported by the
//! platform itself (its JSON error envelope) are returned to callers as data.

use thiserror::Error;

/// Convenience type alias for Results using YdError.
pub type YdResult<T> = Result<T, YdError>;

/// Unified error type for the Yandex Direct client.
#[derive(Error, Debug)]
pub enum YdError {
    // -- Configuration errors --
    /// Failed to load or parse application configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Network errors --
    /// HTTP request failed before a response was received.
    #[error("http error: {0}")]
    Http(String),

    /// HTTP request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// The platform rejected a request. The client returns platform errors
    /// as data; front ends convert them when they need a failing exit.
    #[error("api error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description from the platform.
        message: String,
    },

    // -- Request errors --
    /// Request parameters violate an API constraint and were not sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for YdError {
    fn from(e: serde_json::Error) -> Self {
        YdError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for YdError {
    fn from(e: toml::de::Error) -> Self {
        YdError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yd_error_display() {
        let err = YdError::Config("bad value".to_string());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn test_invalid_request_display() {
        let err = YdError::InvalidRequest("DateFrom without DateTo".into());
        assert_eq!(err.to_string(), "invalid request: DateFrom without DateTo");
    }

    #[test]
    fn test_api_error_display() {
        let err = YdError::Api {
            status: 400,
            message: "error 4000: Invalid request".into(),
        };
        assert_eq!(
            err.to_string(),
            "api error (status 400): error 4000: Invalid request"
        );
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: YdError = parse_err.into();
        assert!(matches!(err, YdError::Serialization(_)));
    }
}
