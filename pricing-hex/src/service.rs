//! Rate Application Service
//!
//! Serves the base-INR rate table through the revalidation window and folds
//! every upstream failure into the single-entry fallback table.

use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;

use pricing_types::{CurrencyCode, FeedError, RateFeed, RateTable, RatesResponse, UpstreamRates};

/// Default revalidation window: 12 hours.
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(43_200);

/// Application service for exchange rates.
///
/// Generic over `F: RateFeed` - the upstream adapter is injected at compile time.
pub struct RateService<F: RateFeed> {
    feed: F,
    revalidate: Duration,
    /// One entry: the last good table. Loads for it are coalesced, and a
    /// failed load is shared with every waiter but never stored.
    cache: Cache<(), RatesResponse>,
}

impl<F: RateFeed> RateService<F> {
    /// Creates a rate service with the default 12 hour window.
    pub fn new(feed: F) -> Self {
        Self::with_revalidate(feed, DEFAULT_REVALIDATE)
    }

    pub fn with_revalidate(feed: F, revalidate: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(revalidate)
            .build();

        Self {
            feed,
            revalidate,
            cache,
        }
    }

    /// Returns a reference to the underlying feed.
    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn revalidate(&self) -> Duration {
        self.revalidate
    }

    /// Current rate table. Never fails: upstream problems produce
    /// `{ base: "INR", rates: { INR: 1 }, error }`, which is not cached.
    #[tracing::instrument(skip(self))]
    pub async fn rates(&self) -> RatesResponse {
        match self.cache.try_get_with((), self.fetch()).await {
            Ok(response) => response,
            Err(e) => RatesResponse::fallback(e.reason()),
        }
    }

    /// The cached table if one is still fresh. Never touches the feed.
    pub async fn cached(&self) -> Option<RatesResponse> {
        self.cache.get(&()).await
    }

    async fn fetch(&self) -> Result<RatesResponse, FeedError> {
        let result = match self.feed.latest().await {
            Ok(upstream) => validate_upstream(upstream),
            Err(e) => Err(e),
        };

        match &result {
            Ok(response) => {
                tracing::info!(currencies = response.rates.len(), "rate table refreshed")
            }
            Err(e) => tracing::warn!(error = %e, "rate feed failed, serving fallback table"),
        }
        result
    }
}

/// Checks an upstream payload and turns it into a proxy response.
pub fn validate_upstream(upstream: UpstreamRates) -> Result<RatesResponse, FeedError> {
    if let Some(result) = upstream.result.as_deref() {
        if result != "success" {
            return Err(FeedError::Shape(format!("result is {result:?}")));
        }
    }

    if !upstream
        .base_code
        .eq_ignore_ascii_case(CurrencyCode::BASE.code())
    {
        return Err(FeedError::Shape(format!(
            "base_code is {:?}",
            upstream.base_code
        )));
    }

    if upstream.rates.is_empty() {
        return Err(FeedError::Shape("rates is empty".into()));
    }

    let rates = RateTable::from_rates(upstream.rates);
    let updated = upstream
        .time_last_update_utc
        .as_deref()
        .map(normalize_timestamp);

    Ok(RatesResponse::new(rates, updated))
}

/// RFC 2822 feed timestamps become RFC 3339; anything else passes through.
fn normalize_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc2822(raw)
        .map(|dt| dt.with_timezone(&Utc).to_rfc3339())
        .unwrap_or_else(|_| raw.to_string())
}
