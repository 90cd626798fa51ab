//! Launcher script-filter result lists.
//!
//! The launcher reads a JSON document of the form
//! `{"items": [{"title": ..., "subtitle": ..., "valid": ..., ...}]}` from
//! stdout. Valid items carry an `arg` that is handed to the next action;
//! invalid items are guidance only, optionally completing the query text.

use serde::Serialize;

use fxconv_types::{ConversionResult, ConvertError};

use crate::service::{CurrencySuggestion, QueryResponse};

pub const DEFAULT_ICON: &str = "icon.png";

const UID_PREFIX: &str = "fxconv";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Icon {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptFilterItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

impl ScriptFilterItem {
    /// An actionable item passing `arg` on.
    pub fn actionable(title: impl Into<String>, arg: impl Into<String>) -> Self {
        Self {
            uid: None,
            arg: Some(arg.into()),
            valid: true,
            autocomplete: None,
            title: title.into(),
            subtitle: String::new(),
            icon: None,
        }
    }

    /// A non-actionable guidance item.
    pub fn guidance(title: impl Into<String>) -> Self {
        Self {
            uid: None,
            arg: None,
            valid: false,
            autocomplete: None,
            title: title.into(),
            subtitle: String::new(),
            icon: None,
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_autocomplete(mut self, autocomplete: impl Into<String>) -> Self {
        self.autocomplete = Some(autocomplete.into());
        self
    }

    pub fn with_icon(mut self, path: impl Into<String>) -> Self {
        self.icon = Some(Icon { path: path.into() });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScriptFilterList {
    pub items: Vec<ScriptFilterItem>,
}

impl ScriptFilterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: ScriptFilterItem) {
        self.items.push(item);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Formats a converted amount for display.
///
/// Two decimals for amounts of at least one unit; smaller amounts keep up
/// to six decimals so that e.g. JPY -> BTC does not collapse to `0.00`.
pub fn format_amount(amount: f64) -> String {
    if amount.abs() >= 1.0 || amount == 0.0 {
        return format!("{:.2}", amount);
    }
    let precise = format!("{:.6}", amount);
    let trimmed = precise.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "0" | "-0" => format!("{:.2}", 0.0),
        other => other.to_string(),
    }
}

/// Turns [`QueryResponse`]s into result lists.
#[derive(Debug, Clone)]
pub struct ScriptFilterRenderer {
    icon: String,
}

impl Default for ScriptFilterRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_ICON)
    }
}

impl ScriptFilterRenderer {
    pub fn new(icon: impl Into<String>) -> Self {
        Self { icon: icon.into() }
    }

    /// Renders a response. The list is never empty.
    pub fn render(&self, response: &QueryResponse) -> ScriptFilterList {
        let mut list = ScriptFilterList::new();
        match response {
            QueryResponse::Conversion(result) if result.is_success() => {
                list.push(self.conversion_item(result));
            }
            QueryResponse::Conversion(result) => {
                list.push(
                    ScriptFilterItem::guidance("Unsupported currency")
                        .with_subtitle(format!(
                            "Cannot convert {} to {}",
                            result.base, result.target
                        ))
                        .with_icon(&self.icon),
                );
            }
            QueryResponse::PrepositionSuggestion { completion } => {
                list.push(
                    ScriptFilterItem::guidance(format!("convert {}...", completion.trim_end()))
                        .with_subtitle("Action this item to autocomplete")
                        .with_autocomplete(completion)
                        .with_icon(&self.icon),
                );
            }
            QueryResponse::TargetSuggestions { prefix, candidates } if candidates.is_empty() => {
                list.push(
                    ScriptFilterItem::guidance("No matching currency")
                        .with_subtitle(format!("Keep typing after \"{}\"", prefix))
                        .with_icon(&self.icon),
                );
            }
            QueryResponse::TargetSuggestions { prefix, candidates } => {
                for candidate in candidates {
                    list.push(self.suggestion_item(prefix, candidate));
                }
            }
            QueryResponse::Unsupported => list.push(self.invalid_query_item()),
        }
        list
    }

    /// Renders a request that could not be answered.
    pub fn render_error(&self, err: &ConvertError) -> ScriptFilterList {
        let mut list = ScriptFilterList::new();
        list.push(
            ScriptFilterItem::guidance("Exchange rates unavailable")
                .with_subtitle(err.to_string())
                .with_icon(&self.icon),
        );
        list
    }

    /// The title shows the rounded amount; `arg` keeps full precision.
    fn conversion_item(&self, result: &ConversionResult) -> ScriptFilterItem {
        let title = format!("{} {}", format_amount(result.target_amount), result.target);
        ScriptFilterItem::actionable(title, result.target_amount.to_string())
            .with_subtitle("Action this item to copy this number to the clipboard")
            .with_icon(&self.icon)
    }

    fn suggestion_item(&self, prefix: &str, candidate: &CurrencySuggestion) -> ScriptFilterItem {
        ScriptFilterItem::guidance(&candidate.code)
            .with_uid(format!("{}.target.{}", UID_PREFIX, candidate.code))
            .with_subtitle(&candidate.name)
            .with_autocomplete(format!("{} {} ", prefix, candidate.code))
            .with_icon(&self.icon)
    }

    fn invalid_query_item(&self) -> ScriptFilterItem {
        ScriptFilterItem::guidance("...")
            .with_subtitle("Start by typing an amount")
            .with_icon(&self.icon)
    }
}
