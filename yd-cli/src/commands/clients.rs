//! Agency clients command.

use clap::Args;

use yd_api::endpoints::agencyclients::AgencyClientsQuery;
use yd_core::config::AppConfig;
use yd_core::constants;
use yd_core::error::YdResult;

use crate::OutputFormat;

#[derive(Args)]
pub struct ClientsArgs {
    /// Client fields to return.
    #[arg(long, value_delimiter = ',', default_value = "ClientId,Login")]
    fields: Vec<String>,

    /// Only these logins.
    #[arg(short = 'l', long = "login", value_delimiter = ',')]
    logins: Vec<String>,

    /// List archived clients instead of active ones.
    #[arg(long)]
    archived: bool,

    /// Page size.
    #[arg(long, default_value_t = constants::DEFAULT_AGENCY_CLIENTS_LIMIT)]
    limit: u64,

    /// Page offset.
    #[arg(long, default_value_t = 0)]
    offset: u64,
}

impl From<ClientsArgs> for AgencyClientsQuery {
    fn from(args: ClientsArgs) -> Self {
        let mut query = AgencyClientsQuery::new(args.fields);
        query.logins = args.logins;
        query.archived = args.archived;
        query.limit = args.limit;
        query.offset = args.offset;
        query
    }
}

pub async fn run(config: &AppConfig, args: ClientsArgs, format: OutputFormat) -> YdResult<()> {
    let api = super::create_api_client(config)?;
    let response = api.agency_clients(&args.into()).await?;
    super::print_listing(response, "Clients", format)
}
