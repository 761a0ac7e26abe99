//! Reports service.

use tracing::{info, warn};

use yd_core::constants::services;
use yd_core::error::YdResult;

use crate::client::{client_login_header, ApiClient};
use crate::report::{ReportOutcome, ReportRequest};

impl ApiClient {
    /// Headers and body for a report request, `Client-Login` included.
    pub fn build_report_request(
        &self,
        request: &ReportRequest,
    ) -> YdResult<(Vec<(String, String)>, serde_json::Value)> {
        let body = request.body()?;
        let mut headers =
            client_login_header(self.effective_client_login(request.client_login.as_deref()));
        headers.extend(request.headers());
        Ok((headers, body))
    }

    /// Request a report, polling with the configured attempt budget.
    pub async fn report(&self, request: &ReportRequest) -> YdResult<ReportOutcome> {
        self.report_with_attempts(request, self.retry_config().max_attempts)
            .await
    }

    /// Request a report, re-polling at most `attempts` times while the
    /// server is still generating it.
    pub async fn report_with_attempts(
        &self,
        request: &ReportRequest,
        attempts: u32,
    ) -> YdResult<ReportOutcome> {
        let (headers, body) = self.build_report_request(request)?;
        let response = self
            .send(services::REPORTS, &headers, &body, attempts)
            .await?;

        let outcome = ReportOutcome::from_response(
            &response,
            &request.formatting,
            self.retry_config().default_retry_in,
        );
        match &outcome {
            ReportOutcome::Ready(rows) => {
                info!(report = %request.report_name, rows = rows.len(), "report ready")
            }
            ReportOutcome::Pending { retry_in, .. } => info!(
                report = %request.report_name,
                "report still generating, server suggests retrying in {}s",
                retry_in.as_secs()
            ),
            ReportOutcome::Failed { status, error } => {
                warn!(report = %request.report_name, status, "report rejected: {error}")
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use yd_core::config::ApiConfig;
    use yd_core::error::YdError;

    use super::*;
    use crate::report::ReportType;
    use crate::transport::{RawResponse, Transport};

    struct Unreachable;

    #[async_trait::async_trait]
    impl Transport for Unreachable {
        async fn post(
            &self,
            _url: &str,
            _headers: &[(String, String)],
            _body: &serde_json::Value,
        ) -> YdResult<RawResponse> {
            Err(YdError::Http("unreachable".into()))
        }
    }

    fn client(default_login: Option<&str>) -> ApiClient {
        let config = ApiConfig {
            token: "t".into(),
            client_login: default_login.map(String::from),
            ..ApiConfig::default()
        };
        ApiClient::with_transport(&config, Arc::new(Unreachable)).unwrap()
    }

    fn login_of(headers: &[(String, String)]) -> Option<&str> {
        headers
            .iter()
            .find(|(k, _)| k == "Client-Login")
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_build_report_request_client_login() {
        let req = ReportRequest::new("r", ReportType::AccountPerformance, ["Clicks"]);

        let (headers, _) = client(None).build_report_request(&req).unwrap();
        assert_eq!(login_of(&headers), None);

        let (headers, _) = client(Some("agency-default")).build_report_request(&req).unwrap();
        assert_eq!(login_of(&headers), Some("agency-default"));

        let req = req.with_client_login("explicit");
        let (headers, body) = client(Some("agency-default")).build_report_request(&req).unwrap();
        assert_eq!(login_of(&headers), Some("explicit"));
        assert_eq!(body["params"]["ReportName"], "r");
        assert_eq!(headers.len(), 6);
    }
}
