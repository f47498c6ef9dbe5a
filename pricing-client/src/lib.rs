//! # Pricing Client
//!
//! Page-layer side of visitor pricing: reads the currency the edge chose,
//! fetches the rate table from `/api/rates` and renders listed INR prices.
//!
//! Nothing here returns an error to the page. A failed fetch becomes the
//! one-entry fallback table, which renders prices unchanged.

pub mod board;
pub mod currency;

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use pricing_types::RatesResponse;
use reqwest::Client;

pub use board::{BoardState, PriceBoard};
pub use currency::{cookie_value, currency_from_cookie_header, resolve_currency};

/// Reason recorded on a fallback built by the client itself.
pub const CLIENT_FALLBACK_REASON: &str = "network";

/// Default lifetime of a fetched table on the client side: 12 hours.
pub const DEFAULT_CACHE_WINDOW: Duration = Duration::from_secs(43_200);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Anything that can hand the board a rate table.
#[async_trait]
pub trait RatesSource: Send + Sync {
    /// Never fails; problems come back as a fallback table.
    async fn fetch_rates(&self) -> RatesResponse;
}

/// Rates proxy client.
pub struct RatesClient {
    base_url: String,
    http: Client,
    cache_window: Duration,
    cache: Cache<(), RatesResponse>,
}

impl RatesClient {
    /// Creates a new client with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a new client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            cache_window: DEFAULT_CACHE_WINDOW,
            cache: table_cache(DEFAULT_CACHE_WINDOW),
        })
    }

    /// Sets how long a successful table is reused. Zero disables reuse.
    pub fn with_cache_window(mut self, window: Duration) -> Self {
        self.cache_window = window;
        self.cache = table_cache(window);
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Fetches `/api/rates`.
    ///
    /// Transport errors, non-2xx statuses and undecodable bodies all yield
    /// the fallback table. A server-side fallback (with `error` set) is
    /// returned as is but not kept.
    pub async fn fetch_rates(&self) -> RatesResponse {
        if let Some(cached) = self.cache.get(&()).await {
            return cached;
        }

        match self.request_rates().await {
            Ok(rates) => {
                if !rates.is_fallback() && !self.cache_window.is_zero() {
                    self.cache.insert((), rates.clone()).await;
                }
                rates
            }
            Err(e) => {
                tracing::warn!(error = %e, "rates fetch failed, using fallback table");
                RatesResponse::fallback(CLIENT_FALLBACK_REASON)
            }
        }
    }

    async fn request_rates(&self) -> Result<RatesResponse, ClientError> {
        let resp = self
            .http
            .get(format!("{}/api/rates", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json::<RatesResponse>().await?)
    }
}

fn table_cache(window: Duration) -> Cache<(), RatesResponse> {
    Cache::builder()
        .max_capacity(1)
        .time_to_live(window)
        .build()
}

#[async_trait]
impl RatesSource for RatesClient {
    async fn fetch_rates(&self) -> RatesResponse {
        RatesClient::fetch_rates(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::get};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves `router` on an ephemeral port and returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_client_creation() {
        let client = RatesClient::new("http://localhost:3000").unwrap();
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = RatesClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_fetch_rates_decodes_table() {
        let base = serve(Router::new().route(
            "/api/rates",
            get(|| async {
                Json(serde_json::json!({
                    "base": "INR",
                    "rates": {"INR": 1, "USD": 0.012},
                    "updated": "2026-10-16T00:02:31+00:00"
                }))
            }),
        ))
        .await;

        let rates = RatesClient::new(base).unwrap().fetch_rates().await;
        assert!(!rates.is_fallback());
        assert_eq!(rates.rates.rate("USD"), Some(0.012));
    }

    #[tokio::test]
    async fn test_server_fallback_is_passed_through() {
        let base = serve(Router::new().route(
            "/api/rates",
            get(|| async {
                Json(serde_json::json!({
                    "base": "INR",
                    "rates": {"INR": 1},
                    "error": "upstream"
                }))
            }),
        ))
        .await;

        let rates = RatesClient::new(base).unwrap().fetch_rates().await;
        assert_eq!(rates.error.as_deref(), Some("upstream"));
        assert_eq!(rates.rates.rate("INR"), Some(1.0));
    }

    #[tokio::test]
    async fn test_server_error_status_is_fallback() {
        let base = serve(Router::new().route(
            "/api/rates",
            get(|| async { StatusCode::BAD_GATEWAY }),
        ))
        .await;

        let rates = RatesClient::new(base).unwrap().fetch_rates().await;
        assert_eq!(rates, RatesResponse::fallback(CLIENT_FALLBACK_REASON));
    }

    #[tokio::test]
    async fn test_garbage_body_is_fallback() {
        let base = serve(Router::new().route("/api/rates", get(|| async { "not json" }))).await;

        let rates = RatesClient::new(base).unwrap().fetch_rates().await;
        assert!(rates.is_fallback());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_fallback() {
        let rates = RatesClient::new("http://127.0.0.1:1").unwrap().fetch_rates().await;
        assert_eq!(rates.base, "INR");
        assert_eq!(rates.rates.len(), 1);
        assert_eq!(rates.error.as_deref(), Some("network"));
    }

    #[tokio::test]
    async fn test_health() {
        let base = serve(Router::new().route("/health", get(|| async { "ok" }))).await;
        assert!(RatesClient::new(base).unwrap().health().await.unwrap());
    }

    #[tokio::test]
    async fn test_health_unreachable_is_error() {
        let result = RatesClient::new("http://127.0.0.1:1").unwrap().health().await;
        assert!(matches!(result, Err(ClientError::Http(_))));
    }

    fn counting_rates(calls: Arc<AtomicUsize>) -> Router {
        Router::new().route(
            "/api/rates",
            get(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Json(serde_json::json!({
                        "base": "INR",
                        "rates": {"INR": 1, "USD": 0.012}
                    }))
                }
            }),
        )
    }

    #[tokio::test]
    async fn test_table_reused_within_window() {
        let calls = Arc::new(AtomicUsize::new(0));
        let base = serve(counting_rates(calls.clone())).await;

        let client = RatesClient::new(base).unwrap();
        client.fetch_rates().await;
        let second = client.fetch_rates().await;

        assert_eq!(second.rates.rate("USD"), Some(0.012));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_window_refetches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let base = serve(counting_rates(calls.clone())).await;

        let client = RatesClient::new(base)
            .unwrap()
            .with_cache_window(Duration::ZERO);
        client.fetch_rates().await;
        client.fetch_rates().await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_slow_server_times_out_to_fallback() {
        let base = serve(Router::new().route(
            "/api/rates",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        ))
        .await;

        let client = RatesClient::with_timeout(base, Duration::from_millis(100)).unwrap();
        let started = std::time::Instant::now();
        let rates = client.fetch_rates().await;

        assert_eq!(rates, RatesResponse::fallback(CLIENT_FALLBACK_REASON));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
