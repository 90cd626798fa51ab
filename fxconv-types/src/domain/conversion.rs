//! Conversion requests and their outcomes.

use serde::{Deserialize, Serialize};

/// Sentinel reported as `target_amount` when no conversion took place.
pub const UNSUPPORTED_AMOUNT: f64 = -1.0;

/// A parsed "convert `amount` `base` to `target`" request.
///
/// `base` and `target` are the raw tokens as typed; the converter
/// normalizes them before lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionQuery {
    pub amount: f64,
    pub base: String,
    pub target: String,
}

/// Outcome of a conversion or a free-text query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    Success,
    /// The converter does not know one of the codes.
    Unsupported,
    /// A well-formed query named a code the converter does not know.
    UnsupportedCurrency,
    /// The text matched no recognized query shape.
    UnsupportedQuery,
}

impl ConversionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionStatus::Success)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub status: ConversionStatus,
    pub base_amount: f64,
    pub base: String,
    pub target: String,
    /// Only meaningful on success; [`UNSUPPORTED_AMOUNT`] otherwise.
    pub target_amount: f64,
}

impl ConversionResult {
    pub fn success(base_amount: f64, base: String, target: String, target_amount: f64) -> Self {
        Self {
            status: ConversionStatus::Success,
            base_amount,
            base,
            target,
            target_amount,
        }
    }

    pub fn unsupported(base_amount: f64, base: String, target: String) -> Self {
        Self {
            status: ConversionStatus::Unsupported,
            base_amount,
            base,
            target,
            target_amount: UNSUPPORTED_AMOUNT,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The converted amount, if the conversion succeeded.
    pub fn converted(&self) -> Option<f64> {
        self.is_success().then_some(self.target_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_uses_sentinel() {
        let result = ConversionResult::unsupported(10.0, "USD".into(), "XXX".into());
        assert_eq!(result.target_amount, -1.0);
        assert_eq!(result.converted(), None);
    }

    #[test]
    fn test_success_exposes_amount() {
        let result = ConversionResult::success(10.0, "USD".into(), "EUR".into(), 9.2);
        assert!(result.is_success());
        assert_eq!(result.converted(), Some(9.2));
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&ConversionStatus::UnsupportedCurrency).unwrap();
        assert_eq!(json, r#""unsupported_currency""#);
        let json = serde_json::to_string(&ConversionStatus::UnsupportedQuery).unwrap();
        assert_eq!(json, r#""unsupported_query""#);
    }
}
