//! Domain models for the currency converter.

pub mod conversion;
pub mod currency;
pub mod snapshot;

pub use conversion::{ConversionQuery, ConversionResult, ConversionStatus, UNSUPPORTED_AMOUNT};
pub use currency::{CurrencyTable, normalize_code};
pub use snapshot::RateSnapshot;
