//! Exchange rate feed port.
//!
//! Implementations can be HTTP clients, fixed tables for tests, etc.

use crate::{FeedError, UpstreamRates};

/// Port trait for the upstream "latest rates, base INR" source.
#[async_trait::async_trait]
pub trait RateFeed: Send + Sync + 'static {
    /// Fetches the latest table. Validation of the payload is the caller's job;
    /// the adapter only reports transport, status and decoding failures.
    async fn latest(&self) -> Result<UpstreamRates, FeedError>;
}
