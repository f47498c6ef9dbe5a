//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server: the rates proxy, the edge currency resolver and
//! the back-office route guard.

pub mod currency;
pub mod guard;
mod handlers;
pub mod rate_limit;
mod server;

/// Route of the rates proxy. Skipped by the currency resolver, limited per
/// client.
pub const RATES_PATH: &str = "/api/rates";

pub use currency::{CurrencyResolver, currency_cookie};
pub use guard::RouteGuard;
pub use handlers::{AppState, rates_cache_control};
pub use rate_limit::RateLimiterState;
pub use server::HttpServer;
