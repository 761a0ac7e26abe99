//! Yandex Direct Core - configuration, error handling and logging.
//!
//! This crate provides the shared foundation used by the API client and CLI:
//! - Application configuration (token, sandbox flag, report polling budget)
//! - A unified error type for transport, configuration and request errors
//! - Structured logging with tracing
//! - Wire-level constants (hosts, API version, defaults)

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;

// Re-export commonly used items at the crate root
pub use config::AppConfig;
pub use error::{YdError, YdResult};
pub use logging::init_logging;
