//! API endpoint modules organized by service.
//!
//! Each module adds typed methods to [`crate::ApiClient`] for one service.

pub mod ads;
pub mod agencyclients;
pub mod campaigns;
pub mod reports;
