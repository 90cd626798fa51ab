//! # Fxconv Types
//!
//! Domain types and port traits for the currency converter.
//! This crate has ZERO external IO dependencies - only data structures,
//! freshness rules, and trait definitions.
//!
//! ## Architecture
//!
//! - `domain/` - Cached documents (CurrencyTable, RateSnapshot) and conversion results
//! - `ports/` - Trait definitions the rate provider and cache adapters implement
//! - `error/` - Service and startup error types

pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    ConversionQuery, ConversionResult, ConversionStatus, CurrencyTable, RateSnapshot,
    UNSUPPORTED_AMOUNT, normalize_code,
};
pub use error::{ConvertError, StartupError};
pub use exchange_rates::{DEFAULT_PIVOT, PivotRates, RateError, check_amount};
pub use ports::{CacheError, CacheStore, ProviderError, RateProvider};
