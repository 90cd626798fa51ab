//! Pivot-Currency Exchange Rates
//!
//! Rate providers quote every currency against a single pivot currency
//! (USD for the free OpenExchangeRates plan). A rate table therefore answers
//! "how many units of X buy one unit of the pivot", and any cross conversion
//! is a two-hop transform: base -> pivot -> target.
//!
//! # Example
//! ```
//! use std::collections::BTreeMap;
//! use exchange_rates::PivotRates;
//!
//! let rates = PivotRates::new(
//!     "USD",
//!     BTreeMap::from([("EUR".to_string(), 0.5), ("GBP".to_string(), 0.25)]),
//! );
//!
//! // 10 EUR -> 20 USD -> 5 GBP
//! assert_eq!(rates.convert(10.0, "EUR", "GBP").unwrap(), 5.0);
//! ```

use std::collections::BTreeMap;

/// The only pivot the free rate plan allows.
pub const DEFAULT_PIVOT: &str = "USD";

/// Error type for rate lookups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateError {
    #[error("Unsupported currency: {0}")]
    UnknownCurrency(String),
    #[error("Amount must be a finite, non-negative number: {0}")]
    InvalidAmount(f64),
}

/// Accepts amounts that are finite and not negative.
pub fn check_amount(amount: f64) -> Result<f64, RateError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(RateError::InvalidAmount(amount))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate Table
// ─────────────────────────────────────────────────────────────────────────────

/// Rates expressed as units of each currency per one unit of `pivot`.
///
/// The pivot itself is always present with a rate of exactly `1.0`.
/// Entries that are not finite and strictly positive are dropped on
/// construction, so every rate held here is safe to divide by.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRates {
    pivot: String,
    rates: BTreeMap<String, f64>,
}

impl PivotRates {
    pub fn new(pivot: impl Into<String>, rates: BTreeMap<String, f64>) -> Self {
        let pivot = pivot.into().to_uppercase();
        let mut rates: BTreeMap<String, f64> = rates
            .into_iter()
            .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
            .collect();
        rates.insert(pivot.clone(), 1.0);
        Self { pivot, rates }
    }

    pub fn pivot(&self) -> &str {
        &self.pivot
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn supports(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Expresses `amount` of `from` in pivot units.
    pub fn to_pivot(&self, amount: f64, from: &str) -> Result<f64, RateError> {
        let rate = self.lookup(from)?;
        if from == self.pivot {
            return Ok(amount);
        }
        Ok(amount / rate)
    }

    /// Expresses `amount` pivot units in `to`.
    pub fn from_pivot(&self, amount: f64, to: &str) -> Result<f64, RateError> {
        Ok(amount * self.lookup(to)?)
    }

    /// Converts `amount` of `from` into `to` by routing through the pivot.
    ///
    /// Both codes are checked before any arithmetic happens, so an unknown
    /// target is reported even when the base is also the pivot. Amounts
    /// must be finite and non-negative.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, RateError> {
        check_amount(amount)?;
        self.lookup(from)?;
        self.lookup(to)?;
        let in_pivot = self.to_pivot(amount, from)?;
        self.from_pivot(in_pivot, to)
    }

    /// Units of `to` received for one unit of `from`.
    pub fn get_rate(&self, from: &str, to: &str) -> Result<f64, RateError> {
        self.convert(1.0, from, to)
    }

    fn lookup(&self, code: &str) -> Result<f64, RateError> {
        self.rate(code)
            .ok_or_else(|| RateError::UnknownCurrency(code.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
