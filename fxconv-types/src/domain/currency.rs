//! Currency code to display name mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Normalizes a raw currency token for lookup.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Mapping from currency code (e.g. `EUR`) to display name (e.g. `Euro`).
///
/// Serialized as a flat JSON object, which is both the provider's wire
/// format and the cache file format. Keys stay sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyTable(BTreeMap<String, String>);

impl CurrencyTable {
    pub fn new(names: BTreeMap<String, String>) -> Self {
        Self(names)
    }

    /// Returns the display name for `code`.
    pub fn name(&self, code: &str) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(code, name)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(code, name)| (code.as_str(), name.as_str()))
    }

    /// Codes containing `partial` (case-insensitive), in code order.
    ///
    /// An empty partial matches every code.
    pub fn matching(&self, partial: &str) -> Vec<(&str, &str)> {
        let needle = normalize_code(partial);
        self.iter().filter(|(code, _)| code.contains(&needle)).collect()
    }
}

impl FromIterator<(String, String)> for CurrencyTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
