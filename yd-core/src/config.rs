//! Application configuration management.
//!
//! Handles loading and saving the client configuration: OAuth token, sandbox
//! routing, report polling budget and logging preferences. Configuration is
//! persisted as TOML on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{YdError, YdResult};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// API connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OAuth bearer token. Acquired outside this client.
    #[serde(default)]
    pub token: String,

    /// Route every request to the sandbox host.
    #[serde(default)]
    pub sandbox: bool,

    /// Default advertiser login for agency accounts (`Client-Login` header).
    #[serde(default)]
    pub client_login: Option<String>,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_api_timeout")]
    pub timeout_ms: u64,

    /// How many times a pending report is re-polled before giving up.
    #[serde(default = "default_report_attempts")]
    pub report_attempts: u32,

    /// Wait in seconds when the server omits the `retryIn` header.
    #[serde(default = "default_retry_in")]
    pub default_retry_in_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_api_timeout() -> u64 {
    constants::DEFAULT_API_TIMEOUT_MS
}

fn default_report_attempts() -> u32 {
    constants::DEFAULT_REPORT_ATTEMPTS
}

fn default_retry_in() -> u64 {
    constants::DEFAULT_RETRY_IN_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            sandbox: false,
            client_login: None,
            timeout_ms: default_api_timeout(),
            report_attempts: default_report_attempts(),
            default_retry_in_secs: default_retry_in(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file path, then apply
    /// environment overrides.
    pub fn load_default() -> YdResult<Self> {
        let path = Self::default_config_path()?;
        let config = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> YdResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> YdResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| YdError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Replace the token with `YANDEX_DIRECT_TOKEN` when that variable is set.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_token_override(std::env::var(constants::TOKEN_ENV_VAR).ok());
        self
    }

    fn apply_token_override(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.api.token = token.trim().to_string();
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> YdResult<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| YdError::Config("could not determine config directory".into()))?;
        Ok(base.join(constants::APP_NAME).join("config.toml"))
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> YdResult<PathBuf> {
        if self.logging.directory.is_empty() {
            let base = dirs::data_dir()
                .ok_or_else(|| YdError::Config("could not determine data directory".into()))?;
            Ok(base.join(constants::APP_NAME).join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }

    /// Check whether a token is available.
    pub fn is_configured(&self) -> bool {
        !self.api.token.is_empty()
    }

    /// Fail with `MissingConfig` when no token is available.
    pub fn require_token(&self) -> YdResult<&str> {
        if self.is_configured() {
            Ok(&self.api.token)
        } else {
            Err(YdError::MissingConfig(format!(
                "api.token (or {})",
                constants::TOKEN_ENV_VAR
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.timeout_ms, 300_000);
        assert_eq!(config.api.report_attempts, 5);
        assert_eq!(config.api.default_retry_in_secs, 60);
        assert!(!config.api.sandbox);
        assert!(config.api.client_login.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(!config.is_configured());
    }

    #[test]
    fn test_roundtrip_toml() {
        let mut config = AppConfig::default();
        config.api.token = "abc".into();
        config.api.client_login = Some("client-1".into());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.api.token, "abc");
        assert_eq!(deserialized.api.client_login.as_deref(), Some("client-1"));
        assert_eq!(deserialized.api.timeout_ms, config.api.timeout_ms);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("[api]\nsandbox = true\n").unwrap();
        assert!(config.api.sandbox);
        assert_eq!(config.api.report_attempts, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_token_override() {
        let mut config = AppConfig::default();
        config.api.token = "from-file".into();

        config.apply_token_override(None);
        assert_eq!(config.api.token, "from-file");

        config.apply_token_override(Some("   ".into()));
        assert_eq!(config.api.token, "from-file");

        config.apply_token_override(Some(" from-env ".into()));
        assert_eq!(config.api.token, "from-env");
    }

    #[test]
    fn test_require_token() {
        let mut config = AppConfig::default();
        assert!(matches!(config.require_token(), Err(YdError::MissingConfig(_))));
        config.api.token = "t".into();
        assert_eq!(config.require_token().unwrap(), "t");
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.api.token = "saved".into();
        config.api.report_attempts = 9;
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.api.token, "saved");
        assert_eq!(loaded.api.report_attempts, 9);
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\ntoken = ").unwrap();
        assert!(matches!(
            AppConfig::load_from_file(&path),
            Err(YdError::Config(_))
        ));
    }
}
