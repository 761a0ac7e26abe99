//! Ads command.

use yd_api::endpoints::ads::AdsQuery;
use yd_core::config::AppConfig;
use yd_core::error::YdResult;

use crate::OutputFormat;

pub async fn run(
    config: &AppConfig,
    campaign_ids: Vec<u64>,
    client_login: Option<String>,
    format: OutputFormat,
) -> YdResult<()> {
    let api = super::create_api_client(config)?;
    let mut query = AdsQuery::new(campaign_ids);
    query.client_login = client_login;
    let response = api.ads(&query).await?;
    super::print_listing(response, "Ads", format)
}
