//! Campaigns service.

use serde_json::json;

use yd_core::constants::services;
use yd_core::error::YdResult;

use crate::client::{client_login_header, ApiClient};
use crate::response::ApiResponse;

/// Parameters for `campaigns.get`.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignsQuery {
    pub client_login: Option<String>,
    pub field_names: Vec<String>,
}

impl Default for CampaignsQuery {
    fn default() -> Self {
        Self {
            client_login: None,
            field_names: vec!["Id".into(), "Name".into()],
        }
    }
}

impl CampaignsQuery {
    pub fn body(&self) -> serde_json::Value {
        json!({
            "method": "get",
            "params": {
                "SelectionCriteria": {},
                "FieldNames": self.field_names,
            },
        })
    }
}

impl ApiClient {
    /// List all campaigns of an advertiser.
    pub async fn campaigns(&self, query: &CampaignsQuery) -> YdResult<ApiResponse> {
        let headers =
            client_login_header(self.effective_client_login(query.client_login.as_deref()));
        self.send_json(services::CAMPAIGNS, &headers, &query.body())
            .await
    }
}
