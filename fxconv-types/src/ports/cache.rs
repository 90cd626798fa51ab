//! Cache store port.
//!
//! The currency table and the rate snapshot are two independent documents.
//! Adapters (flat JSON files, in-memory) implement this trait.

use crate::domain::{CurrencyTable, RateSnapshot};

/// Error type for cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache document is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Port trait for the local rate cache.
///
/// `Ok(None)` means nothing has been cached yet. An `Err` from a load means
/// the document exists but could not be read or decoded.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync + 'static {
    async fn load_currencies(&self) -> Result<Option<CurrencyTable>, CacheError>;

    /// Replaces the cached currency table wholesale.
    async fn save_currencies(&self, table: &CurrencyTable) -> Result<(), CacheError>;

    async fn load_rates(&self) -> Result<Option<RateSnapshot>, CacheError>;

    /// Replaces the cached rate snapshot wholesale.
    async fn save_rates(&self, snapshot: &RateSnapshot) -> Result<(), CacheError>;
}
