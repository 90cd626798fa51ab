//! Latest-rates snapshot with freshness rules.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use exchange_rates::{DEFAULT_PIVOT, PivotRates};
use serde::{Deserialize, Serialize};

fn default_pivot() -> String {
    DEFAULT_PIVOT.to_string()
}

/// A point-in-time rate table quoted against `base` (the pivot).
///
/// Field order is alphabetical so the cache file keeps a stable key order.
/// Provider responses carry extra fields (`disclaimer`, `license`) which
/// are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    #[serde(default = "default_pivot")]
    pub base: String,
    pub rates: BTreeMap<String, f64>,
    /// Unix seconds at which the provider published these rates.
    pub timestamp: i64,
}

impl RateSnapshot {
    pub fn new(timestamp: i64, base: impl Into<String>, rates: BTreeMap<String, f64>) -> Self {
        Self {
            base: base.into(),
            rates,
            timestamp,
        }
    }

    /// Seconds elapsed since the snapshot was published.
    ///
    /// `None` when the cached timestamp is so far off that the difference
    /// does not fit in an `i64`.
    pub fn age_secs(&self, now: DateTime<Utc>) -> Option<i64> {
        now.timestamp().checked_sub(self.timestamp)
    }

    /// A snapshot is fresh while its age is strictly below `window`.
    ///
    /// Unrepresentable ages and timestamps more than `window` in the future
    /// count as stale, so a bogus cached timestamp forces a refresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        let window = i64::try_from(window.as_secs()).unwrap_or(i64::MAX);
        match self.age_secs(now) {
            Some(age) => age < window && age > -window,
            None => false,
        }
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Rate table usable for conversions.
    pub fn pivot_rates(&self) -> PivotRates {
        PivotRates::new(self.base.clone(), self.rates.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIX_HOURS: Duration = Duration::from_secs(6 * 60 * 60);

    fn snapshot(timestamp: i64) -> RateSnapshot {
        RateSnapshot::new(
            timestamp,
            "USD",
            BTreeMap::from([("EUR".to_string(), 0.92)]),
        )
    }

    #[test]
    fn test_fresh_inside_window() {
        let now = Utc::now();
        let snap = snapshot(now.timestamp() - 60);
        assert!(snap.is_fresh(now, SIX_HOURS));
    }

    #[test]
    fn test_stale_at_window_boundary() {
        let now = Utc::now();
        let snap = snapshot(now.timestamp() - SIX_HOURS.as_secs() as i64);
        assert!(!snap.is_fresh(now, SIX_HOURS));
    }

    #[test]
    fn test_future_timestamp_counts_as_fresh() {
        let now = Utc::now();
        let snap = snapshot(now.timestamp() + 30);
        assert!(snap.is_fresh(now, SIX_HOURS));
    }

    #[test]
    fn test_far_future_timestamp_is_stale() {
        let now = Utc::now();
        let snap = snapshot(now.timestamp() + SIX_HOURS.as_secs() as i64 + 1);
        assert!(!snap.is_fresh(now, SIX_HOURS));
    }

    #[test]
    fn test_overflowing_timestamps_are_stale() {
        let now = Utc::now();
        for timestamp in [i64::MIN, i64::MAX] {
            let snap = snapshot(timestamp);
            assert!(!snap.is_fresh(now, SIX_HOURS), "timestamp {timestamp}");
        }
        assert_eq!(snapshot(i64::MIN).age_secs(now), None);
    }

    #[test]
    fn test_parses_provider_body() {
        let body = r#"{
            "disclaimer": "Usage subject to terms",
            "license": "https://openexchangerates.org/license",
            "timestamp": 1700000000,
            "base": "USD",
            "rates": { "EUR": 0.92, "GBP": 0.79 }
        }"#;
        let snap: RateSnapshot = serde_json::from_str(body).unwrap();
        assert_eq!(snap.timestamp, 1_700_000_000);
        assert_eq!(snap.rates.len(), 2);
        assert_eq!(snap.pivot_rates().rate("USD"), Some(1.0));
    }

    #[test]
    fn test_missing_base_defaults_to_usd() {
        let snap: RateSnapshot =
            serde_json::from_str(r#"{"timestamp": 1, "rates": {}}"#).unwrap();
        assert_eq!(snap.base, "USD");
    }

    #[test]
    fn test_serialized_keys_sorted() {
        let json = serde_json::to_string(&snapshot(5)).unwrap();
        assert_eq!(json, r#"{"base":"USD","rates":{"EUR":0.92},"timestamp":5}"#);
    }
}
