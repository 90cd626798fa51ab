//! # Fxconv Repository
//!
//! Concrete cache store implementations (adapters) for the currency converter.
//! This crate provides the adapters that implement the `CacheStore` port.

use std::path::Path;

pub mod file;
pub mod memory;


pub use file::{CURRENCY_CACHE, JsonFileStore, RATES_CACHE};
pub use memory::MemoryStore;

/// Build the file-backed cache store rooted at `cache_dir`.
///
/// # Examples
///
/// ```ignore
/// let store = build_store("~/.cache/fxconv");
/// // ~/.cache/fxconv/currencies.json and ~/.cache/fxconv/latest.json
/// ```
pub fn build_store(cache_dir: impl AsRef<Path>) -> JsonFileStore {
    JsonFileStore::in_dir(cache_dir)
}
