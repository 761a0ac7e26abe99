//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use yd_api::{ApiClient, RawResponse, Transport};
use yd_core::config::ApiConfig;
use yd_core::error::{YdError, YdResult};

/// A request as seen by the transport.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
    /// Virtual time at which the request was sent.
    pub sent_at: tokio::time::Instant,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Transport that replays scripted responses in order and records every
/// request. Running out of script is a transport error.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<YdResult<RawResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new(responses: Vec<RawResponse>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(responses.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: YdError) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::from(vec![Err(error)])),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> YdResult<RawResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.to_vec(),
            body: body.clone(),
            sent_at: tokio::time::Instant::now(),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(YdError::Http("no scripted response left".into())))
    }
}

/// API config with a test token.
pub fn test_config(sandbox: bool) -> ApiConfig {
    ApiConfig {
        token: "test-token".into(),
        sandbox,
        ..ApiConfig::default()
    }
}

/// Client over a mock transport.
pub fn test_client(transport: Arc<MockTransport>, sandbox: bool) -> ApiClient {
    ApiClient::with_transport(&test_config(sandbox), transport).expect("failed to build client")
}

/// 202 with a `retryIn` header.
pub fn pending(status: u16, retry_in: Option<u64>) -> RawResponse {
    let resp = RawResponse::new(status, "");
    match retry_in {
        Some(secs) => resp.with_header("retryIn", secs.to_string()),
        None => resp,
    }
}
