//! Quote-of-the-day service
//!
//! Ties the cache, the quotes API and the clock together and publishes every
//! quote it hands out to subscribers. Callers never see an error: API
//! failures turn into a role-specific fallback quote with `success: false`.

use tokio::sync::watch;

use super::{
    fallback_quote, normalize_response, select_category, Quote, QuoteCache, QuoteError,
    QuoteResponse, QuoteSource, Role, RANDOM_CATEGORY,
};
use crate::clock::{date_string, Clock};
use crate::storage::KeyValueStore;

/// Serves the quote of the day for a role
pub struct QuoteService<S, Q, C> {
    cache: QuoteCache<S>,
    source: Q,
    clock: C,
    publisher: watch::Sender<Option<Quote>>,
}

impl<S, Q, C> QuoteService<S, Q, C>
where
    S: KeyValueStore,
    Q: QuoteSource,
    C: Clock,
{
    pub fn new(store: S, source: Q, clock: C) -> Self {
        let (publisher, _) = watch::channel(None);
        Self {
            cache: QuoteCache::new(store),
            source,
            clock,
            publisher,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn source(&self) -> &Q {
        &self.source
    }

    pub fn cache(&self) -> &QuoteCache<S> {
        &self.cache
    }

    /// Receiver that observes every published quote
    ///
    /// Holds `None` until the first quote is published.
    pub fn subscribe(&self) -> watch::Receiver<Option<Quote>> {
        self.publisher.subscribe()
    }

    /// Latest published quote, if any
    pub fn current(&self) -> Option<Quote> {
        self.publisher.borrow().clone()
    }

    /// Returns the quote of the day for `role`
    ///
    /// # Behavior
    /// - If the cache was filled today, returns the cached quote without a network call
    /// - Otherwise fetches the role's category of the day, caches and publishes it
    /// - On API failure publishes and returns the role's fallback quote with
    ///   `success = false` and an `"API Error: ..."` message
    pub async fn get_quote_of_the_day(&self, role: Role) -> QuoteResponse {
        let today = self.clock.today();

        if let Some(entry) = self.cache.read() {
            if entry.fetch_date == date_string(today) {
                tracing::debug!(%role, date = %entry.fetch_date, "Serving cached quote");
                self.publish(&entry.quote);
                return QuoteResponse::ok(entry.quote, "Quote loaded from cache");
            }
        }

        self.fetch_for_role(role).await
    }

    /// Clears the cache and fetches a fresh quote of the day for `role`
    pub async fn refresh_quote(&self, role: Role) -> QuoteResponse {
        self.clear_cache();
        self.fetch_for_role(role).await
    }

    /// Fetches a random quote outside the daily protocol
    ///
    /// Nothing is cached or published. `category` of `None` means any category.
    pub async fn get_random_quote(&self, role: Role, category: Option<&str>) -> QuoteResponse {
        let category = category.unwrap_or(RANDOM_CATEGORY);
        match self.fetch(category).await {
            Ok(quote) => QuoteResponse::ok(quote, "Random quote fetched successfully"),
            Err(e) => {
                tracing::warn!(%role, category, error = %e, "Random quote fetch failed");
                QuoteResponse::failed(fallback_quote(role), format!("API Error: {e}"))
            }
        }
    }

    /// Removes the cached quote and its date marker
    ///
    /// Storage failures are logged; a stale slot is caught by the date check.
    pub fn clear_cache(&self) {
        if let Err(e) = self.cache.clear() {
            tracing::warn!(error = %e, "Failed to clear quote cache");
        }
    }

    async fn fetch_for_role(&self, role: Role) -> QuoteResponse {
        let today = self.clock.today();
        let category = select_category(role, today);

        match self.fetch(category).await {
            Ok(quote) => {
                tracing::info!(%role, category, author = %quote.author, "Fetched quote of the day");
                if let Err(e) = self.cache.write(&quote, today) {
                    tracing::warn!(error = %e, "Failed to persist quote of the day");
                }
                self.publish(&quote);
                QuoteResponse::ok(quote, "Quote fetched successfully")
            }
            Err(e) => {
                tracing::warn!(%role, category, error = %e, "Quote API failed, using fallback");
                let quote = fallback_quote(role);
                self.publish(&quote);
                QuoteResponse::failed(quote, format!("API Error: {e}"))
            }
        }
    }

    async fn fetch(&self, category: &str) -> Result<Quote, QuoteError> {
        let body = self.source.fetch_random(Some(category.to_string())).await?;
        normalize_response(&body, category)
    }

    fn publish(&self, quote: &Quote) {
        self.publisher.send_replace(Some(quote.clone()));
    }
}
