//! Yandex Direct API - HTTP client for the Yandex Direct JSON API v5.
//!
//! This crate provides a typed client for the reports service and the
//! agency-client, campaign and ad listing services. Report generation on the
//! platform is asynchronous: the client polls a queued report, waiting the
//! server-supplied `retryIn` interval between attempts, and reshapes the final
//! TSV payload into rows.

pub mod client;
pub mod endpoints;
pub mod report;
pub mod response;
pub mod transport;

// Re-export key types
pub use client::{ApiClient, RetryConfig};
pub use report::{
    parse_report, DateRange, DateRangeType, ReportFormatting, ReportOutcome, ReportRecord,
    ReportRequest, ReportRows, ReportType,
};
pub use response::{ApiError, ApiResponse};
pub use transport::{RawResponse, ReqwestTransport, Transport};
