//! Rate provider port.
//!
//! Implementations can be HTTP clients, fixed-rate fakes, etc.

use std::time::Duration;

use crate::domain::{CurrencyTable, RateSnapshot};

/// Error type for rate provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Rate provider unavailable: {0}")]
    Unavailable(String),

    #[error("Rate provider timed out after {0:?}")]
    Timeout(Duration),

    #[error("Rate provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Port trait for remote rate sources.
///
/// Each call is a single attempt; retries are not part of the contract.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the code -> display name mapping.
    async fn fetch_currency_table(&self) -> Result<CurrencyTable, ProviderError>;

    /// Fetches the latest rates quoted as units per one `pivot`.
    async fn fetch_latest_rates(&self, pivot: &str) -> Result<RateSnapshot, ProviderError>;
}
