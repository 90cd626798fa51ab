//! Free-text query classification.
//!
//! Shapes are tried in a fixed order and the first match wins:
//!
//! 1. `<amount> <base>` - suggest a preposition
//! 2. `<amount> <base> <as|in|to> [0-2 chars]` - suggest target currencies
//! 3. `<amount> <base> <as|in|to> <target>` - convert
//!
//! Amounts are digits with up to two decimal places. Currency tokens are any
//! three non-space characters; whether they name a real currency is decided
//! later by the converter.

use std::sync::LazyLock;

use exchange_rates::check_amount;
use regex::{Captures, Regex};

use fxconv_types::ConversionQuery;

const AMOUNT: &str = r"(?P<amount>\d+(?:\.\d{1,2})?)";
const BASE: &str = r"(?P<base>\S{3})";
const PREPOSITION: &str = r"(?P<prep>(?i:as|in|to))";

static PREPOSITION_PENDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*{AMOUNT}\s+{BASE}\s*$")).expect("preposition pattern")
});

static TARGET_PENDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*{AMOUNT}\s+{BASE}\s+{PREPOSITION}(?:\s+(?P<partial>\S{{0,2}}))?\s*$"
    ))
    .expect("partial target pattern")
});

static EXPLICIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*{AMOUNT}\s+{BASE}\s+{PREPOSITION}\s+(?P<target>\S{{3}})\s*$"
    ))
    .expect("explicit pattern")
});

/// The shape a free-text query was classified as.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedQuery {
    /// Fully specified conversion.
    Explicit(ConversionQuery),
    /// Amount and base only; `prefix` is the query so far, tidied.
    CompletePreposition { prefix: String },
    /// Amount, base and preposition, plus whatever of the target was typed.
    CompleteTarget { prefix: String, partial: String },
    Unrecognized,
}

/// Classifies `text` into exactly one [`ParsedQuery`] shape.
pub fn parse_query(text: &str) -> ParsedQuery {
    if let Some(caps) = PREPOSITION_PENDING.captures(text) {
        if amount(&caps).is_some() {
            return ParsedQuery::CompletePreposition {
                prefix: format!("{} {}", &caps["amount"], &caps["base"]),
            };
        }
    }

    if let Some(caps) = TARGET_PENDING.captures(text) {
        if amount(&caps).is_some() {
            return ParsedQuery::CompleteTarget {
                prefix: format!(
                    "{} {} {}",
                    &caps["amount"],
                    &caps["base"],
                    caps["prep"].to_lowercase()
                ),
                partial: caps
                    .name("partial")
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            };
        }
    }

    if let Some(caps) = EXPLICIT.captures(text) {
        if let Some(amount) = amount(&caps) {
            return ParsedQuery::Explicit(ConversionQuery {
                amount,
                base: caps["base"].to_string(),
                target: caps["target"].to_string(),
            });
        }
    }

    ParsedQuery::Unrecognized
}

fn amount(caps: &Captures<'_>) -> Option<f64> {
    let amount = caps["amount"].parse::<f64>().ok()?;
    check_amount(amount).ok()
}
