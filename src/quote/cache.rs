//! Single-slot quote cache
//!
//! The most recent quote and the date it was fetched live under two fixed
//! storage keys. The slot is shared by every role: switching roles on the
//! same day reads whatever quote was cached last.

use chrono::NaiveDate;

use super::Quote;
use crate::clock::date_string;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key for the JSON-serialized quote
pub const QUOTE_KEY: &str = "quote_of_the_day";

/// Storage key for the `YYYY-MM-DD` fetch date
pub const LAST_FETCH_KEY: &str = "quote_last_fetch";

/// Cached quote together with the day it was fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub quote: Quote,
    /// Fetch date as `YYYY-MM-DD`
    pub fetch_date: String,
}

/// Quote cache over a key-value store
#[derive(Debug)]
pub struct QuoteCache<S> {
    store: S,
}

impl<S: KeyValueStore> QuoteCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the cached entry
    ///
    /// # Returns
    /// * `Some(CacheEntry)` if both the quote and its fetch date are present
    /// * `None` if either is missing or the quote cannot be parsed
    pub fn read(&self) -> Option<CacheEntry> {
        let raw = self.store.get(QUOTE_KEY)?;
        let fetch_date = self.store.get(LAST_FETCH_KEY)?;
        let quote = match serde_json::from_str::<Quote>(&raw) {
            Ok(quote) => quote,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable cached quote");
                return None;
            }
        };
        Some(CacheEntry { quote, fetch_date })
    }

    /// Overwrites the cache with `quote`, stamped with `today`
    pub fn write(&self, quote: &Quote, today: NaiveDate) -> Result<(), StorageError> {
        let json = serde_json::to_string(quote)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.store.set(QUOTE_KEY, &json)?;
        self.store.set(LAST_FETCH_KEY, &date_string(today))
    }

    /// Removes both the quote and its date marker
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(QUOTE_KEY)?;
        self.store.remove(LAST_FETCH_KEY)
    }

    /// True iff an entry exists and was fetched on `today`
    pub fn is_valid_for_today(&self, today: NaiveDate) -> bool {
        self.read()
            .is_some_and(|entry| entry.fetch_date == date_string(today))
    }
}
