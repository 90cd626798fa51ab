//! In-process cache store.
//!
//! Used by service tests and anywhere a throwaway cache is wanted.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use fxconv_types::{CacheError, CacheStore, CurrencyTable, RateSnapshot};

#[derive(Debug, Default)]
pub struct MemoryStore {
    currencies: Mutex<Option<CurrencyTable>>,
    rates: Mutex<Option<RateSnapshot>>,
    corrupt_rates: Mutex<bool>,
    rate_writes: Mutex<usize>,
    currency_writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currencies(self, table: CurrencyTable) -> Self {
        *lock(&self.currencies) = Some(table);
        self
    }

    pub fn with_rates(self, snapshot: RateSnapshot) -> Self {
        *lock(&self.rates) = Some(snapshot);
        self
    }

    /// Makes the rate document undecodable until the next save.
    pub fn with_corrupt_rates(self) -> Self {
        *lock(&self.corrupt_rates) = true;
        self
    }

    pub fn rates(&self) -> Option<RateSnapshot> {
        lock(&self.rates).clone()
    }

    pub fn currencies(&self) -> Option<CurrencyTable> {
        lock(&self.currencies).clone()
    }

    /// Number of times the rate snapshot has been saved.
    pub fn rate_writes(&self) -> usize {
        *lock(&self.rate_writes)
    }

    /// Number of times the currency table has been saved.
    pub fn currency_writes(&self) -> usize {
        *lock(&self.currency_writes)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn load_currencies(&self) -> Result<Option<CurrencyTable>, CacheError> {
        Ok(self.currencies())
    }

    async fn save_currencies(&self, table: &CurrencyTable) -> Result<(), CacheError> {
        *lock(&self.currencies) = Some(table.clone());
        *lock(&self.currency_writes) += 1;
        Ok(())
    }

    async fn load_rates(&self) -> Result<Option<RateSnapshot>, CacheError> {
        if *lock(&self.corrupt_rates) {
            return serde_json::from_str::<RateSnapshot>("{\"rates\":")
                .map(Some)
                .map_err(CacheError::from);
        }
        Ok(self.rates())
    }

    async fn save_rates(&self, snapshot: &RateSnapshot) -> Result<(), CacheError> {
        *lock(&self.rates) = Some(snapshot.clone());
        *lock(&self.corrupt_rates) = false;
        *lock(&self.rate_writes) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[tokio::test]
    async fn test_empty_store_misses() {
        let store = MemoryStore::new();
        assert!(store.load_rates().await.unwrap().is_none());
        assert!(store.load_currencies().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_rates_until_saved() {
        let store = MemoryStore::new().with_corrupt_rates();
        assert!(matches!(store.load_rates().await, Err(CacheError::Json(_))));

        let snapshot = RateSnapshot::new(1, "USD", BTreeMap::new());
        store.save_rates(&snapshot).await.unwrap();
        assert_eq!(store.load_rates().await.unwrap(), Some(snapshot));
        assert_eq!(store.rate_writes(), 1);
    }
}
