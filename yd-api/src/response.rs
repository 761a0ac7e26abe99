//! Server response types.
//!
//! JSON services answer with a `result` object on success and an `error`
//! object on failure:
//! ```json
//! { "error": { "request_id": "8695244274068608439", "error_code": 54,
//!              "error_string": "No rights", "error_detail": "..." } }
//! ```
//! The reports service uses the same error object for non-2xx statuses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiError {
    /// Request identifier, useful when contacting support.
    #[serde(default)]
    pub request_id: Option<String>,
    /// Numeric error code.
    #[serde(default)]
    pub error_code: i64,
    /// Short error description.
    #[serde(default)]
    pub error_string: String,
    /// Detailed error description.
    #[serde(default)]
    pub error_detail: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

impl ApiError {
    /// Parse an error body. Bodies that are not an error envelope (proxy
    /// pages, truncated output) are kept verbatim in `error_string`.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.error,
            Err(_) => Self {
                error_string: body.trim().to_string(),
                ..Self::default()
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {}: {}", self.error_code, self.error_string)?;
        if !self.error_detail.is_empty() {
            write!(f, " ({})", self.error_detail)?;
        }
        if let Some(ref id) = self.request_id {
            write!(f, " [request {id}]")?;
        }
        Ok(())
    }
}

/// Response envelope of the JSON (non-report) services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    /// HTTP status of the response. Not part of the JSON body.
    #[serde(skip)]
    pub status: u16,
    /// Method result (present on success).
    pub result: Option<T>,
    /// Error details (present on failure).
    #[serde(default)]
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    /// Whether the platform reported no error.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Split into the result or the platform error.
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_parsed() {
        let body = r#"{"error":{"request_id":"123","error_code":8000,"error_string":"Invalid request","error_detail":"ReportName is required"}}"#;
        let err = ApiError::from_body(body);
        assert_eq!(err.error_code, 8000);
        assert_eq!(err.request_id.as_deref(), Some("123"));
        assert_eq!(err.error_detail, "ReportName is required");
        assert_eq!(
            err.to_string(),
            "error 8000: Invalid request (ReportName is required) [request 123]"
        );
    }

    #[test]
    fn test_non_json_error_body_kept() {
        let err = ApiError::from_body("  <html>Bad Gateway</html>\n");
        assert_eq!(err.error_code, 0);
        assert_eq!(err.error_string, "<html>Bad Gateway</html>");
    }

    #[test]
    fn test_api_response_success() {
        let json = r#"{"result":{"Campaigns":[{"Id":1,"Name":"Brand"}]}}"#;
        let resp: ApiResponse = serde_json::from_str(json).unwrap();
        assert!(resp.is_success());
        let result = resp.into_result().unwrap().unwrap();
        assert_eq!(result["Campaigns"][0]["Name"], "Brand");
    }

    #[test]
    fn test_api_response_error() {
        let json = r#"{"error":{"error_code":53,"error_string":"Authorization error"}}"#;
        let resp: ApiResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.status, 0);
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.error_code, 53);
        assert!(err.request_id.is_none());
    }
}
