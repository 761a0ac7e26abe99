//! Yandex Direct CLI - command-line front end for the Yandex Direct API client.
//!
//! Useful for pulling ad-hoc reports into a terminal or a shell pipeline and
//! for looking up the account's clients, campaigns and ads.

mod commands;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use yd_core::config::AppConfig;
use yd_core::error::YdResult;
use yd_core::logging;

/// Yandex Direct reports and listings from the command line.
#[derive(Parser)]
#[command(
    name = "yandex-direct",
    version,
    about = "Yandex Direct API v5 client",
    long_about = "A command-line client for the Yandex Direct JSON API v5.\n\
                  Requests reports (waiting while the server generates them) and lists\n\
                  agency clients, campaigns and ads."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Send requests to the sandbox host (overrides config).
    #[arg(long, global = true)]
    sandbox: bool,

    /// OAuth token (overrides config and environment).
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a statistics report.
    Report(commands::report::ReportArgs),
    /// List the advertisers of an agency account.
    Clients(commands::clients::ClientsArgs),
    /// List campaigns.
    Campaigns {
        /// Advertiser login (agency accounts).
        #[arg(short = 'l', long)]
        client_login: Option<String>,
        /// Campaign fields to return.
        #[arg(long, value_delimiter = ',', default_value = "Id,Name")]
        fields: Vec<String>,
    },
    /// List the ads of one or more campaigns.
    Ads {
        /// Campaign IDs.
        #[arg(required = true, value_delimiter = ',')]
        campaign_ids: Vec<u64>,
        /// Advertiser login (agency accounts).
        #[arg(short = 'l', long)]
        client_login: Option<String>,
    },
    /// Show or create the configuration file.
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn load_config(path: Option<&Path>) -> YdResult<AppConfig> {
    let config = match path {
        Some(path) if path.exists() => AppConfig::load_from_file(path)?.with_env_overrides(),
        Some(_) => AppConfig::default().with_env_overrides(),
        None => AppConfig::load_default()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> YdResult<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if cli.sandbox {
        config.api.sandbox = true;
    }
    if let Some(token) = cli.token {
        config.api.token = token;
    }

    // Initialize logging
    let level = cli.verbose.then_some("debug");
    let log_dir = config
        .effective_log_dir()
        .unwrap_or_else(|_| PathBuf::from("logs"));
    let _guard = match logging::init_logging(&config.logging, level, &log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            logging::init_console_logging(level.unwrap_or(config.logging.level.as_str()));
            warn!("file logging disabled ({}): {e}", log_dir.display());
            None
        }
    };

    debug!(
        "yandex-direct v{} (sandbox={})",
        yd_core::constants::APP_VERSION,
        config.api.sandbox
    );

    // Dispatch to command handlers
    match cli.command {
        Commands::Report(args) => commands::report::run(&config, args, cli.format).await,
        Commands::Clients(args) => commands::clients::run(&config, args, cli.format).await,
        Commands::Campaigns {
            client_login,
            fields,
        } => commands::campaigns::run(&config, client_login, fields, cli.format).await,
        Commands::Ads {
            campaign_ids,
            client_login,
        } => commands::ads::run(&config, campaign_ids, client_login, cli.format).await,
        Commands::Config { action } => {
            commands::config::run(&config, cli.config.as_deref(), action, cli.format)
        }
    }
}
