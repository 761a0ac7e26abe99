//! Agency clients service.

use serde_json::json;

use yd_core::constants::{self, services};
use yd_core::error::YdResult;

use crate::client::ApiClient;
use crate::report::YesNo;
use crate::response::ApiResponse;

/// Parameters for `agencyclients.get`.
#[derive(Debug, Clone, PartialEq)]
pub struct AgencyClientsQuery {
    /// Client fields to return, e.g. `ClientId`, `Login`.
    pub field_names: Vec<String>,
    /// Restrict to these logins. Empty means all clients.
    pub logins: Vec<String>,
    pub archived: bool,
    pub limit: u64,
    pub offset: u64,
}

impl AgencyClientsQuery {
    pub fn new<I, S>(field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field_names: field_names.into_iter().map(Into::into).collect(),
            logins: Vec::new(),
            archived: false,
            limit: constants::DEFAULT_AGENCY_CLIENTS_LIMIT,
            offset: 0,
        }
    }

    pub fn body(&self) -> serde_json::Value {
        json!({
            "method": "get",
            "params": {
                "SelectionCriteria": {
                    "Logins": self.logins,
                    "Archived": YesNo::from(self.archived),
                },
                "FieldNames": self.field_names,
                "Page": {
                    "Limit": self.limit,
                    "Offset": self.offset,
                },
            },
        })
    }
}

impl ApiClient {
    /// List the agency's advertisers.
    pub async fn agency_clients(&self, query: &AgencyClientsQuery) -> YdResult<ApiResponse> {
        self.send_json(services::AGENCY_CLIENTS, &[], &query.body())
            .await
    }
}
