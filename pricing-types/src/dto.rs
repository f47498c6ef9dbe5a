//! Data Transfer Objects (DTOs) for the rates proxy and the upstream feed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use exchange_rates::{CurrencyCode, RateTable, ResolutionSource};

// ─────────────────────────────────────────────────────────────────────────────
// Rates proxy
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `GET /api/rates`. Always served with HTTP 200; failures are
/// reported in `error` next to a minimal but valid table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatesResponse {
    /// Base currency of the table
    #[schema(example = "INR")]
    pub base: String,
    /// Currency code to units per one base unit
    #[schema(value_type = Object, example = json!({"INR": 1.0, "USD": 0.012}))]
    #[serde(default)]
    pub rates: RateTable,
    /// When the upstream feed last refreshed (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// Why the fallback table is being served
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "upstream")]
    pub error: Option<String>,
}

impl RatesResponse {
    pub fn new(rates: RateTable, updated: Option<String>) -> Self {
        Self {
            base: CurrencyCode::BASE.code().to_string(),
            rates,
            updated,
            error: None,
        }
    }

    /// `{ base: "INR", rates: { INR: 1 }, error: <reason> }`
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            base: CurrencyCode::BASE.code().to_string(),
            rates: RateTable::base_only(),
            updated: None,
            error: Some(reason.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Upstream feed
// ─────────────────────────────────────────────────────────────────────────────

/// Shape of the upstream "latest rates, base INR" payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamRates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub base_code: String,
    pub rates: HashMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_last_update_utc: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Currency resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `GET /api/currency`: what the edge resolved for this request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrencyResponse {
    pub currency: CurrencyCode,
    pub source: ResolutionSource,
    /// Locale prices in this currency are formatted with
    #[schema(example = "de-DE")]
    pub locale: String,
}
