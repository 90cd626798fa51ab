//! Conversion Application Service
//!
//! Owns the rate cache policy (freshness window, refresh-on-miss) and the
//! dispatch of free-text queries. Talks to the outside world only through
//! the `RateProvider` and `CacheStore` ports.

use std::time::Duration;

use chrono::Utc;
use exchange_rates::{DEFAULT_PIVOT, PivotRates, RateError, check_amount};
use serde::Serialize;

use fxconv_types::{
    CacheStore, ConversionResult, ConversionStatus, ConvertError, CurrencyTable, RateProvider,
    RateSnapshot, normalize_code,
};

use crate::query::{ParsedQuery, parse_query};

/// Rates older than this are refetched before use.
pub const DEFAULT_RATES_FRESHNESS: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Currency every cached rate is quoted against.
    pub pivot: String,
    pub rates_freshness: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            pivot: DEFAULT_PIVOT.to_string(),
            rates_freshness: DEFAULT_RATES_FRESHNESS,
        }
    }
}

/// One target currency offered while the user is still typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencySuggestion {
    pub code: String,
    pub name: String,
}

/// What a free-text query resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResponse {
    /// Status is either `Success` or `UnsupportedCurrency`.
    Conversion(ConversionResult),
    /// `completion` is the query with a preposition appended.
    PrepositionSuggestion { completion: String },
    TargetSuggestions {
        prefix: String,
        candidates: Vec<CurrencySuggestion>,
    },
    Unsupported,
}

impl QueryResponse {
    /// Query-level status; suggestions carry none.
    pub fn status(&self) -> Option<ConversionStatus> {
        match self {
            QueryResponse::Conversion(result) => Some(result.status),
            QueryResponse::Unsupported => Some(ConversionStatus::UnsupportedQuery),
            _ => None,
        }
    }
}

/// Application service for currency conversion.
///
/// Generic over the provider and the cache store, so tests can inject
/// in-memory fakes and the binary injects the HTTP client and JSON files.
pub struct ConversionService<P: RateProvider, S: CacheStore> {
    provider: P,
    store: S,
    config: ServiceConfig,
}

impl<P: RateProvider, S: CacheStore> ConversionService<P, S> {
    /// Creates a service with the default USD pivot and six hour freshness.
    pub fn new(provider: P, store: S) -> Self {
        Self::with_config(provider, store, ServiceConfig::default())
    }

    pub fn with_config(provider: P, store: S, config: ServiceConfig) -> Self {
        let config = ServiceConfig {
            pivot: normalize_code(&config.pivot),
            ..config
        };
        Self {
            provider,
            store,
            config,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rate Cache & Converter
    // ─────────────────────────────────────────────────────────────────────────────

    /// Returns the cached currency table, fetching it once if absent.
    ///
    /// Currency names never expire; only a missing or unreadable cache
    /// triggers a fetch.
    pub async fn supported_currencies(&self) -> Result<CurrencyTable, ConvertError> {
        match self.store.load_currencies().await {
            Ok(Some(table)) => return Ok(table),
            Ok(None) => tracing::debug!("currency table not cached"),
            Err(e) => tracing::warn!(error = %e, "discarding unreadable currency cache"),
        }

        let table = self.provider.fetch_currency_table().await?;
        if let Err(e) = self.store.save_currencies(&table).await {
            tracing::warn!(error = %e, "failed to cache currency table");
        }
        Ok(table)
    }

    /// Converts `amount` of `base` into `target` at the latest rates.
    ///
    /// Unknown codes and amounts that are negative or not finite are
    /// reported as [`ConversionStatus::Unsupported`], not as an error. Only a
    /// failing rate refresh is an error.
    pub async fn convert(
        &self,
        amount: f64,
        base: &str,
        target: &str,
    ) -> Result<ConversionResult, ConvertError> {
        let base = normalize_code(base);
        let target = normalize_code(target);
        if let Err(e) = check_amount(amount) {
            tracing::debug!(error = %e, "rejected amount");
            return Ok(ConversionResult::unsupported(amount, base, target));
        }
        let rates = self.get_rates().await?;

        match rates.convert(amount, &base, &target) {
            Ok(target_amount) => {
                tracing::debug!(amount, %base, %target, target_amount, "converted");
                Ok(ConversionResult::success(amount, base, target, target_amount))
            }
            Err(RateError::UnknownCurrency(code)) => {
                tracing::debug!(%code, "unsupported currency");
                Ok(ConversionResult::unsupported(amount, base, target))
            }
            Err(e @ RateError::InvalidAmount(_)) => {
                tracing::debug!(error = %e, "rejected amount");
                Ok(ConversionResult::unsupported(amount, base, target))
            }
        }
    }

    async fn get_rates(&self) -> Result<PivotRates, ConvertError> {
        let now = Utc::now();
        let cached = match self.store.load_rates().await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable rate cache");
                None
            }
        };

        let snapshot = match cached {
            Some(snapshot)
                if snapshot.base == self.config.pivot
                    && snapshot.is_fresh(now, self.config.rates_freshness) =>
            {
                tracing::debug!(age_secs = ?snapshot.age_secs(now), "using cached rates");
                snapshot
            }
            Some(snapshot) => {
                tracing::info!(
                    age_secs = ?snapshot.age_secs(now),
                    base = %snapshot.base,
                    "cached rates are stale"
                );
                self.refresh_rates().await?
            }
            None => self.refresh_rates().await?,
        };

        Ok(snapshot.pivot_rates())
    }

    async fn refresh_rates(&self) -> Result<RateSnapshot, ConvertError> {
        let snapshot = self.provider.fetch_latest_rates(&self.config.pivot).await?;
        if let Err(e) = self.store.save_rates(&snapshot).await {
            tracing::warn!(error = %e, "failed to cache latest rates");
        }
        Ok(snapshot)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Query Dispatcher
    // ─────────────────────────────────────────────────────────────────────────────

    /// Classifies `text` and answers it.
    pub async fn execute_query(&self, text: &str) -> Result<QueryResponse, ConvertError> {
        match parse_query(text) {
            ParsedQuery::Explicit(query) => {
                let mut result = self
                    .convert(query.amount, &query.base, &query.target)
                    .await?;
                if !result.is_success() {
                    result.status = ConversionStatus::UnsupportedCurrency;
                }
                Ok(QueryResponse::Conversion(result))
            }
            ParsedQuery::CompletePreposition { prefix } => {
                Ok(QueryResponse::PrepositionSuggestion {
                    completion: format!("{} to ", prefix),
                })
            }
            ParsedQuery::CompleteTarget { prefix, partial } => {
                let table = self.supported_currencies().await?;
                let candidates = table
                    .matching(&partial)
                    .into_iter()
                    .map(|(code, name)| CurrencySuggestion {
                        code: code.to_string(),
                        name: name.to_string(),
                    })
                    .collect();
                Ok(QueryResponse::TargetSuggestions { prefix, candidates })
            }
            ParsedQuery::Unrecognized => {
                tracing::debug!(query = text, "unrecognized query");
                Ok(QueryResponse::Unsupported)
            }
        }
    }
}
