//! Configuration commands.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use console::style;

use yd_core::config::AppConfig;
use yd_core::error::{YdError, YdResult};

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration (token masked).
    Show,
    /// Print the configuration file path.
    Path,
    /// Get a setting by key path.
    Get {
        /// Key path, e.g. "api.sandbox" or "logging.level".
        key: String,
    },
    /// Set a setting by key path and save the file.
    Set {
        /// Key path, e.g. "api.report_attempts".
        key: String,
        /// New value.
        value: String,
    },
    /// Write a configuration file with defaults.
    Init {
        /// OAuth token to store.
        #[arg(long)]
        token: Option<String>,
        /// Use the sandbox host by default.
        #[arg(long)]
        sandbox: bool,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn mask_token(token: &str) -> String {
    if token.is_empty() {
        "(not set)".to_string()
    } else {
        "********".to_string()
    }
}

/// Resolve a dot-separated key path to a display value.
fn get_setting_value(cfg: &AppConfig, key: &str) -> Option<String> {
    match key {
        "api.token" => Some(mask_token(&cfg.api.token)),
        "api.sandbox" => Some(cfg.api.sandbox.to_string()),
        "api.client_login" => Some(cfg.api.client_login.clone().unwrap_or_default()),
        "api.timeout_ms" => Some(cfg.api.timeout_ms.to_string()),
        "api.report_attempts" => Some(cfg.api.report_attempts.to_string()),
        "api.default_retry_in_secs" => Some(cfg.api.default_retry_in_secs.to_string()),
        "logging.level" => Some(cfg.logging.level.clone()),
        "logging.directory" => Some(cfg.logging.directory.clone()),
        "logging.json_output" => Some(cfg.logging.json_output.to_string()),
        _ => None,
    }
}

/// Apply a value to a dot-separated key path.
fn set_setting_value(cfg: &mut AppConfig, key: &str, value: &str) -> Result<(), String> {
    match key {
        "api.token" => cfg.api.token = value.trim().to_string(),
        "api.sandbox" => {
            cfg.api.sandbox = value.parse().map_err(|_| "expected true/false".to_string())?;
        }
        "api.client_login" => {
            cfg.api.client_login = Some(value.trim().to_string()).filter(|v| !v.is_empty());
        }
        "api.timeout_ms" => {
            cfg.api.timeout_ms = value.parse().map_err(|_| "invalid integer".to_string())?;
        }
        "api.report_attempts" => {
            cfg.api.report_attempts = value.parse().map_err(|_| "invalid integer".to_string())?;
        }
        "api.default_retry_in_secs" => {
            cfg.api.default_retry_in_secs =
                value.parse().map_err(|_| "invalid integer".to_string())?;
        }
        "logging.level" => {
            let v = value.to_lowercase();
            if !["trace", "debug", "info", "warn", "error"].contains(&v.as_str()) {
                return Err("expected one of: trace, debug, info, warn, error".to_string());
            }
            cfg.logging.level = v;
        }
        "logging.directory" => cfg.logging.directory = value.to_string(),
        "logging.json_output" => {
            cfg.logging.json_output = value.parse().map_err(|_| "expected true/false".to_string())?;
        }
        _ => return Err(format!("unknown setting key: {key}")),
    }
    Ok(())
}

fn resolve_path(explicit: Option<&Path>) -> YdResult<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => AppConfig::default_config_path(),
    }
}

/// Load the file as stored, without environment or command-line overrides.
fn load_stored(path: &Path) -> YdResult<AppConfig> {
    if path.exists() {
        AppConfig::load_from_file(path)
    } else {
        Ok(AppConfig::default())
    }
}

pub fn run(
    config: &AppConfig,
    config_path: Option<&Path>,
    action: ConfigAction,
    format: OutputFormat,
) -> YdResult<()> {
    match action {
        ConfigAction::Show => {
            let mut shown = config.clone();
            shown.api.token = mask_token(&config.api.token);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
                OutputFormat::Text => {
                    let mut table = super::new_table();
                    table.set_header(vec!["Key", "Value"]);
                    for key in [
                        "api.token",
                        "api.sandbox",
                        "api.client_login",
                        "api.timeout_ms",
                        "api.report_attempts",
                        "api.default_retry_in_secs",
                        "logging.level",
                        "logging.directory",
                        "logging.json_output",
                    ] {
                        let value = get_setting_value(config, key).unwrap_or_default();
                        table.add_row(vec![key.to_string(), value]);
                    }
                    println!("{table}");
                }
            }
        }
        ConfigAction::Path => {
            println!("{}", resolve_path(config_path)?.display());
        }
        ConfigAction::Get { key } => {
            let value = get_setting_value(config, &key)
                .ok_or_else(|| YdError::Config(format!("unknown setting key: {key}")))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let path = resolve_path(config_path)?;
            let mut stored = load_stored(&path)?;
            set_setting_value(&mut stored, &key, &value).map_err(YdError::Config)?;
            stored.save_to_file(&path)?;
            println!("{} {key} updated in {}", style("OK").green().bold(), path.display());
        }
        ConfigAction::Init {
            token,
            sandbox,
            force,
        } => {
            let path = resolve_path(config_path)?;
            if path.exists() && !force {
                return Err(YdError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            let mut fresh = AppConfig::default();
            fresh.api.token = token.unwrap_or_default();
            fresh.api.sandbox = sandbox;
            fresh.save_to_file(&path)?;
            println!("{} wrote {}", style("OK").green().bold(), path.display());
        }
    }
    Ok(())
}
