//! Rate feed backed by the free, key-less open.er-api.com endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use pricing_types::{FeedError, RateFeed, UpstreamRates};

/// Latest rates with INR as the base.
pub const DEFAULT_FEED_URL: &str = "https://open.er-api.com/v6/latest/INR";

pub struct OpenErApiFeed {
    url: String,
    http: Client,
}

impl OpenErApiFeed {
    /// Creates a feed client; `timeout` bounds each upstream request.
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RateFeed for OpenErApiFeed {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn latest(&self) -> Result<UpstreamRates, FeedError> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        resp.json::<UpstreamRates>()
            .await
            .map_err(|e| FeedError::Shape(e.to_string()))
    }
}
