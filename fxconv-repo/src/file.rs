//! Flat JSON file pair cache.
//!
//! No locking: two processes refreshing at once may interleave writes.
//! Acceptable for a single-user local tool.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use fxconv_types::{CacheError, CacheStore, CurrencyTable, RateSnapshot};

pub const CURRENCY_CACHE: &str = "currencies.json";
pub const RATES_CACHE: &str = "latest.json";

/// Cache store keeping each document in its own pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    currencies_path: PathBuf,
    rates_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(currencies_path: impl Into<PathBuf>, rates_path: impl Into<PathBuf>) -> Self {
        Self {
            currencies_path: currencies_path.into(),
            rates_path: rates_path.into(),
        }
    }

    /// Uses the default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(CURRENCY_CACHE), dir.join(RATES_CACHE))
    }

    pub fn currencies_path(&self) -> &Path {
        &self.currencies_path
    }

    pub fn rates_path(&self) -> &Path {
        &self.rates_path
    }
}

#[async_trait]
impl CacheStore for JsonFileStore {
    async fn load_currencies(&self) -> Result<Option<CurrencyTable>, CacheError> {
        read_document(&self.currencies_path).await
    }

    async fn save_currencies(&self, table: &CurrencyTable) -> Result<(), CacheError> {
        write_document(&self.currencies_path, table).await
    }

    async fn load_rates(&self) -> Result<Option<RateSnapshot>, CacheError> {
        read_document(&self.rates_path).await
    }

    async fn save_rates(&self, snapshot: &RateSnapshot) -> Result<(), CacheError> {
        write_document(&self.rates_path, snapshot).await
    }
}

async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CacheError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "cache file not found");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

async fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), CacheError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut body = serde_json::to_vec_pretty(document)?;
    body.push(b'\n');
    tokio::fs::write(path, body).await?;
    tracing::debug!(path = %path.display(), "cache file written");
    Ok(())
}
