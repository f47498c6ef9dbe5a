//! HTTP request handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, StatusCode, Uri, header::CACHE_CONTROL},
    response::{IntoResponse, Response},
};

use exchange_rates::Resolution;
use pricing_types::{AppError, CurrencyResponse, RateFeed, RatesResponse};

use super::rate_limit::{RATE_LIMITED_REASON, RateLimiterState};
use crate::RateService;

/// Application state shared across handlers.
pub struct AppState<F: RateFeed> {
    pub service: Arc<RateService<F>>,
    pub rate_limiter: Arc<RateLimiterState>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, format!("Not found: {msg}")),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// `public, s-maxage=<window>, stale-while-revalidate=<2 x window>`
pub fn rates_cache_control(revalidate_secs: u64) -> String {
    format!(
        "public, s-maxage={revalidate_secs}, stale-while-revalidate={}",
        revalidate_secs.saturating_mul(2)
    )
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Rates proxy. Always 200: upstream failures come back as the fallback
/// table with an `error` tag.
///
/// A client over its allowance is served whatever is cached, without an
/// upstream call. With nothing cached it gets a `rate_limited` fallback
/// marked `no-store`.
#[tracing::instrument(skip_all)]
pub async fn rates<F: RateFeed>(
    State(state): State<Arc<AppState<F>>>,
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
    headers: HeaderMap,
) -> Response {
    let peer = connect_info.map(|Extension(ConnectInfo(addr))| addr.ip());
    let client = state.rate_limiter.client_key(&headers, peer);
    let cache_control = rates_cache_control(state.service.revalidate().as_secs());

    if !state.rate_limiter.check(&client) {
        tracing::warn!(%client, "rates proxy rate limit exceeded");
        return match state.service.cached().await {
            Some(body) => rates_response(body, &cache_control),
            None => rates_response(RatesResponse::fallback(RATE_LIMITED_REASON), "no-store"),
        };
    }

    rates_response(state.service.rates().await, &cache_control)
}

fn rates_response(body: RatesResponse, cache_control: &str) -> Response {
    let mut response = Json(body).into_response();
    if let Ok(value) = HeaderValue::from_str(cache_control) {
        response.headers_mut().insert(CACHE_CONTROL, value);
    }
    response
}

/// What the edge resolver decided for this request.
pub async fn currency(resolution: Option<Extension<Resolution>>) -> Json<CurrencyResponse> {
    let Resolution { currency, source } = resolution
        .map(|Extension(resolution)| resolution)
        .unwrap_or_else(Resolution::fallback);

    Json(CurrencyResponse {
        currency,
        source,
        locale: currency.locale().to_string(),
    })
}

/// Catch-all for unknown routes when no site directory is served.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError(AppError::NotFound(uri.path().to_string()))
}
