//! Application-wide constants.

/// Application name, used for config and log directories.
pub const APP_NAME: &str = "YandexDirect";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Production API host.
pub const PRODUCTION_ENDPOINT: &str = "https://api.direct.yandex.com";

/// Sandbox API host.
pub const SANDBOX_ENDPOINT: &str = "https://api-sandbox.direct.yandex.com";

/// JSON API version path segment.
pub const API_VERSION: &str = "v5";

/// Environment variable that overrides the configured OAuth token.
pub const TOKEN_ENV_VAR: &str = "YANDEX_DIRECT_TOKEN";

/// Default request timeout in milliseconds. Online reports can take minutes.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 300_000;

/// Default number of re-polls for a report still being generated.
pub const DEFAULT_REPORT_ATTEMPTS: u32 = 5;

/// Wait applied when a pending report response carries no `retryIn` header.
pub const DEFAULT_RETRY_IN_SECS: u64 = 60;

/// Report page limit treated as "no practical limit".
pub const DEFAULT_REPORT_PAGE_LIMIT: u64 = 1_000_000;

/// Default page size for agency client listing.
pub const DEFAULT_AGENCY_CLIENTS_LIMIT: u64 = 10_000;

/// Service names as they appear in the URL path.
pub mod services {
    pub const REPORTS: &str = "reports";
    pub const AGENCY_CLIENTS: &str = "agencyclients";
    pub const CAMPAIGNS: &str = "campaigns";
    pub const ADS: &str = "ads";
}

/// Request and response header names used by the reports service.
pub mod headers {
    pub const AUTHORIZATION: &str = "Authorization";
    pub const CLIENT_LOGIN: &str = "Client-Login";
    pub const PROCESSING_MODE: &str = "processingMode";
    pub const RETURN_MONEY_IN_MICROS: &str = "returnMoneyInMicros";
    pub const SKIP_REPORT_HEADER: &str = "skipReportHeader";
    pub const SKIP_COLUMN_HEADER: &str = "skipColumnHeader";
    pub const SKIP_REPORT_SUMMARY: &str = "skipReportSummary";
    pub const RETRY_IN: &str = "retryIn";
}
