//! HTTP client for the Yandex Direct JSON API v5.
//!
//! Handles endpoint selection (production or sandbox), bearer authentication,
//! and the polling loop for reports the server is still generating.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use yd_core::config::ApiConfig;
use yd_core::constants::{self, headers};
use yd_core::error::{YdError, YdResult};

use crate::response::ApiResponse;
use crate::transport::{RawResponse, ReqwestTransport, Transport};

/// Polling configuration for asynchronously generated reports.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// How many times a 201/202 response is answered with a re-poll.
    pub max_attempts: u32,
    /// Wait used when a pending response carries no `retryIn` header.
    pub default_retry_in: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: constants::DEFAULT_REPORT_ATTEMPTS,
            default_retry_in: Duration::from_secs(constants::DEFAULT_RETRY_IN_SECS),
        }
    }
}

impl From<&ApiConfig> for RetryConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            max_attempts: config.report_attempts,
            default_retry_in: Duration::from_secs(config.default_retry_in_secs),
        }
    }
}

/// Client for the Yandex Direct API.
///
/// Holds only immutable configuration; every call is independent, so the
/// client can be cloned freely.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    token: String,
    sandbox: bool,
    /// Login sent as `Client-Login` when a call does not name one.
    client_login: Option<String>,
    retry_config: RetryConfig,
}

impl ApiClient {
    /// Create a client backed by reqwest.
    pub fn new(config: &ApiConfig) -> YdResult<Self> {
        let transport = ReqwestTransport::new(Duration::from_millis(config.timeout_ms))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(config: &ApiConfig, transport: Arc<dyn Transport>) -> YdResult<Self> {
        if config.token.trim().is_empty() {
            return Err(YdError::MissingConfig("api.token".into()));
        }

        Ok(Self {
            transport,
            token: config.token.trim().to_string(),
            sandbox: config.sandbox,
            client_login: config.client_login.clone().filter(|l| !l.is_empty()),
            retry_config: RetryConfig::from(config),
        })
    }

    /// Set custom retry configuration.
    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    pub fn is_sandbox(&self) -> bool {
        self.sandbox
    }

    /// Host all requests are sent to.
    pub fn endpoint(&self) -> &'static str {
        if self.sandbox {
            constants::SANDBOX_ENDPOINT
        } else {
            constants::PRODUCTION_ENDPOINT
        }
    }

    /// Full URL of a service, e.g. `https://api.direct.yandex.com/json/v5/reports`.
    pub fn service_url(&self, service: &str) -> String {
        format!("{}/json/{}/{service}", self.endpoint(), constants::API_VERSION)
    }

    /// Resolve the `Client-Login` for a call: the explicit one, else the default.
    pub(crate) fn effective_client_login<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit
            .filter(|l| !l.is_empty())
            .or(self.client_login.as_deref())
    }

    /// Caller headers plus our bearer token. A caller-supplied
    /// `Authorization` is replaced.
    fn authorized_headers(&self, extra: &[(String, String)]) -> Vec<(String, String)> {
        let mut merged: Vec<(String, String)> = extra
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case(headers::AUTHORIZATION))
            .cloned()
            .collect();
        merged.push((
            headers::AUTHORIZATION.to_string(),
            format!("Bearer {}", self.token),
        ));
        merged
    }

    /// POST `body` to `service`, re-polling while the server reports the
    /// result as queued or in progress.
    ///
    /// Each 201/202 costs one attempt and waits the server's `retryIn`.
    /// Once `attempts` is spent the last response is returned as-is, so the
    /// caller has to look at its status. Transport errors are not retried.
    pub async fn send(
        &self,
        service: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
        attempts: u32,
    ) -> YdResult<RawResponse> {
        let url = self.service_url(service);
        let headers = self.authorized_headers(headers);
        let mut attempts_remaining = attempts;

        loop {
            debug!(service, attempts_remaining, "POST {url}");
            let response = self.transport.post(&url, &headers, body).await?;

            if !response.is_pending() {
                debug!(service, status = response.status, "request finished");
                return Ok(response);
            }

            if attempts_remaining == 0 {
                warn!(
                    service,
                    status = response.status,
                    "result still pending after {attempts} re-polls, giving up"
                );
                return Ok(response);
            }

            let wait = response.retry_in(self.retry_config.default_retry_in);
            info!(
                service,
                status = response.status,
                attempts_remaining,
                "result not ready, polling again in {}s",
                wait.as_secs()
            );
            tokio::time::sleep(wait).await;
            attempts_remaining -= 1;
        }
    }

    /// Single request for the listing services: no re-polls, JSON envelope
    /// stamped with the HTTP status it arrived with.
    pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        service: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> YdResult<ApiResponse<T>> {
        let response = self.send(service, headers, body, 0).await?;
        let mut envelope: ApiResponse<T> = response.json()?;
        envelope.status = response.status;
        Ok(envelope)
    }
}

/// `Client-Login` header for a call, if any.
pub(crate) fn client_login_header(login: Option<&str>) -> Vec<(String, String)> {
    login
        .map(|l| vec![(headers::CLIENT_LOGIN.to_string(), l.to_string())])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverTransport;

    #[async_trait::async_trait]
    impl Transport for NeverTransport {
        async fn post(
            &self,
            _url: &str,
            _headers: &[(String, String)],
            _body: &serde_json::Value,
        ) -> YdResult<RawResponse> {
            Err(YdError::Http("offline".into()))
        }
    }

    fn client(sandbox: bool) -> ApiClient {
        let config = ApiConfig {
            token: "secret".into(),
            sandbox,
            ..ApiConfig::default()
        };
        ApiClient::with_transport(&config, Arc::new(NeverTransport)).unwrap()
    }

    #[test]
    fn test_service_url_production() {
        assert_eq!(
            client(false).service_url("reports"),
            "https://api.direct.yandex.com/json/v5/reports"
        );
    }

    #[test]
    fn test_service_url_sandbox() {
        assert_eq!(
            client(true).service_url("campaigns"),
            "https://api-sandbox.direct.yandex.com/json/v5/campaigns"
        );
    }

    #[test]
    fn test_missing_token_rejected() {
        let config = ApiConfig::default();
        let result = ApiClient::with_transport(&config, Arc::new(NeverTransport));
        assert!(matches!(result, Err(YdError::MissingConfig(_))));
    }

    #[test]
    fn test_authorization_header_overrides_caller() {
        let headers = client(false).authorized_headers(&[
            ("authorization".into(), "Bearer other".into()),
            ("Client-Login".into(), "acme".into()),
        ]);
        assert_eq!(
            headers,
            vec![
                ("Client-Login".to_string(), "acme".to_string()),
                ("Authorization".to_string(), "Bearer secret".to_string()),
            ]
        );
    }

    #[test]
    fn test_retry_config_from_api_config() {
        let config = ApiConfig {
            report_attempts: 2,
            default_retry_in_secs: 10,
            ..ApiConfig::default()
        };
        let retry = RetryConfig::from(&config);
        assert_eq!(retry.max_attempts, 2);
        assert_eq!(retry.default_retry_in, Duration::from_secs(10));
    }

    #[test]
    fn test_effective_client_login() {
        let config = ApiConfig {
            token: "t".into(),
            client_login: Some("default-login".into()),
            ..ApiConfig::default()
        };
        let c = ApiClient::with_transport(&config, Arc::new(NeverTransport)).unwrap();
        assert_eq!(c.effective_client_login(None), Some("default-login"));
        assert_eq!(c.effective_client_login(Some("")), Some("default-login"));
        assert_eq!(c.effective_client_login(Some("other")), Some("other"));
        assert_eq!(client(false).effective_client_login(None), None);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let err = client(false)
            .send("reports", &[], &serde_json::json!({}), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, YdError::Http(_)));
    }
}
