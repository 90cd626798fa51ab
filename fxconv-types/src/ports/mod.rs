//! Port traits (interfaces for adapters).
//!
//! The conversion service depends on these traits, not on the HTTP client
//! or the cache files behind them.

mod cache;
mod provider;

pub use cache::{CacheError, CacheStore};
pub use provider::{ProviderError, RateProvider};
