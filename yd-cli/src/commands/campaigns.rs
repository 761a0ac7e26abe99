//! Campaigns command.

use yd_api::endpoints::campaigns::CampaignsQuery;
use yd_core::config::AppConfig;
use yd_core::error::YdResult;

use crate::OutputFormat;

pub async fn run(
    config: &AppConfig,
    client_login: Option<String>,
    fields: Vec<String>,
    format: OutputFormat,
) -> YdResult<()> {
    let api = super::create_api_client(config)?;
    let query = CampaignsQuery {
        client_login,
        field_names: fields,
    };
    let response = api.campaigns(&query).await?;
    super::print_listing(response, "Campaigns", format)
}
