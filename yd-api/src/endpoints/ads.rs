//! Ads service.

use serde_json::json;

use yd_core::constants::services;
use yd_core::error::{YdError, YdResult};

use crate::client::{client_login_header, ApiClient};
use crate::response::ApiResponse;

/// Parameters for `ads.get`.
#[derive(Debug, Clone, PartialEq)]
pub struct AdsQuery {
    pub campaign_ids: Vec<u64>,
    pub client_login: Option<String>,
    pub field_names: Vec<String>,
    /// Fields of the `TextAd` sub-object, e.g. `Href`, `Title`.
    pub text_ad_field_names: Vec<String>,
}

impl AdsQuery {
    pub fn new(campaign_ids: Vec<u64>) -> Self {
        Self {
            campaign_ids,
            client_login: None,
            field_names: vec!["CampaignId".into(), "Id".into()],
            text_ad_field_names: vec!["Href".into()],
        }
    }

    pub fn body(&self) -> serde_json::Value {
        json!({
            "method": "get",
            "params": {
                "SelectionCriteria": {
                    "CampaignIds": self.campaign_ids,
                },
                "FieldNames": self.field_names,
                "TextAdFieldNames": self.text_ad_field_names,
            },
        })
    }
}

impl ApiClient {
    /// List the ads of the given campaigns.
    pub async fn ads(&self, query: &AdsQuery) -> YdResult<ApiResponse> {
        if query.campaign_ids.is_empty() {
            return Err(YdError::InvalidRequest(
                "ads.get needs at least one campaign id".into(),
            ));
        }
        let headers =
            client_login_header(self.effective_client_login(query.client_login.as_deref()));
        self.send_json(services::ADS, &headers, &query.body()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ads_body() {
        let body = AdsQuery::new(vec![101, 202]).body();
        let params = &body["params"];
        assert_eq!(body["method"], "get");
        assert_eq!(params["SelectionCriteria"]["CampaignIds"], json!([101, 202]));
        assert_eq!(params["FieldNames"], json!(["CampaignId", "Id"]));
        assert_eq!(params["TextAdFieldNames"], json!(["Href"]));
    }
}
