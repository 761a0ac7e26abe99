//! HTTP transport used by the API client.
//!
//! The client never talks to reqwest directly: every request goes through the
//! [`Transport`] trait so the polling loop can be driven by scripted responses
//! in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::trace;

use yd_core::error::{YdError, YdResult};

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
    /// Body decoded as text.
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value. Names are compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// 200: the request completed and the body holds the result.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// 201 (report queued) or 202 (report still generating).
    pub fn is_pending(&self) -> bool {
        matches!(self.status, 201 | 202)
    }

    /// Server hint for when to poll again, from the `retryIn` header.
    ///
    /// Falls back to `default` when the header is missing or not a whole
    /// number of seconds.
    pub fn retry_in(&self, default: Duration) -> Duration {
        self.header(yd_core::constants::headers::RETRY_IN)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(default)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> YdResult<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| YdError::Serialization(format!("failed to parse response: {e}")))
    }
}

/// Something that can POST a JSON body and hand back the full response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> YdResult<RawResponse>;
}

/// reqwest-backed transport used outside of tests.
#[derive(Clone)]
pub struct ReqwestTransport {
    inner: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> YdResult<Self> {
        let inner = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(15))
            .pool_max_idle_per_host(2)
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| YdError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { inner })
    }

    /// Classify a reqwest error into a YdError variant.
    fn classify_error(e: reqwest::Error) -> YdError {
        if e.is_timeout() {
            YdError::Timeout(e.to_string())
        } else if e.is_connect() {
            YdError::Http(format!("connection failed: {e}"))
        } else {
            YdError::Http(e.to_string())
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> YdResult<RawResponse> {
        let mut builder = self.inner.post(url).json(body);
        for (key, value) in headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(Self::classify_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| YdError::Http(format!("failed to read response body: {e}")))?;

        trace!(status, bytes = body.len(), "response from {url}");
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
