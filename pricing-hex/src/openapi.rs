//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use exchange_rates::{CurrencyCode, ResolutionSource};
use pricing_types::dto::{CurrencyResponse, RatesResponse};
use utoipa::OpenApi;

// Dummy functions to generate path documentation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Latest exchange rates, base INR
///
/// Served from a 12 hour cache. When the upstream feed fails the response is
/// still 200, with a one-entry table and an `error` tag.
#[utoipa::path(
    get,
    path = "/api/rates",
    tag = "rates",
    responses(
        (status = 200, description = "Rate table, possibly the fallback table. Clients over their allowance get the cached table or a `rate_limited` fallback.", body = RatesResponse,
            headers(("Cache-Control" = String, description = "public, s-maxage=43200, stale-while-revalidate=86400")))
    )
)]
async fn rates() {}

/// Currency resolved for this request
///
/// Also sets the `preferred_currency` cookie.
#[utoipa::path(
    get,
    path = "/api/currency",
    tag = "currency",
    params(
        ("x-vercel-ip-country" = Option<String>, Header, description = "CDN country code"),
        ("accept-language" = Option<String>, Header, description = "Browser language preferences")
    ),
    responses(
        (status = 200, description = "Resolved currency", body = CurrencyResponse)
    )
)]
async fn currency() {}

/// OpenAPI documentation for the pricing edge.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Visitor Pricing API",
        version = "1.0.0",
        description = "Exchange rates for display prices and the visitor currency chosen at the edge.\n\nPrices are authored in INR; clients convert with the `/api/rates` table and format in the currency from the `preferred_currency` cookie.",
        license(name = "MIT"),
    ),
    paths(health, rates, currency),
    components(
        schemas(
            RatesResponse,
            CurrencyResponse,
            CurrencyCode,
            ResolutionSource,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rates", description = "Exchange rate proxy"),
        (name = "currency", description = "Visitor currency resolution"),
    )
)]
pub struct ApiDoc;
