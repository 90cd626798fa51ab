//! # Fxconv Hex
//!
//! Application service layer and launcher adapter for the currency converter.
//!
//! ## Architecture
//!
//! - `query/` - Free-text query classification (pure)
//! - `service/` - Conversion service (cache policy, pivot conversion, dispatch)
//! - `inbound/` - Launcher result-list adapter
//!
//! The service is generic over `P: RateProvider` and `S: CacheStore`,
//! allowing different adapters to be injected.

pub mod inbound;
pub mod query;
pub mod service;


pub use query::{ParsedQuery, parse_query};
pub use service::{
    ConversionService, CurrencySuggestion, DEFAULT_RATES_FRESHNESS, QueryResponse, ServiceConfig,
};
