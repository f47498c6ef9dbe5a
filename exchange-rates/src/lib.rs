//! Currency core for visitor price display.
//!
//! Everything in this crate is pure and synchronous: no IO, no globals that
//! can change at runtime. The HTTP edge and the page-layer client both build
//! on it, so the region table and the locale-guess rules exist exactly once.
//!
//! - [`currency`] - supported display currencies, generated by `define_currencies!`
//! - [`region`] - region code to currency lookup, generated by `define_regions!`
//! - [`resolve`] - the single resolver fed by a country and/or language hint
//! - [`rates`] - base-INR rate table and `convert_from_inr`
//! - [`format`] - locale-aware whole-unit formatting with a manual fallback
//!
//! # Example
//! ```
//! use exchange_rates::{LocaleHint, RateTable, convert_from_inr, format_currency, resolve_currency};
//!
//! let resolution = resolve_currency(LocaleHint::new(None, Some("fr-FR,fr;q=0.9")));
//! assert_eq!(resolution.currency.code(), "EUR");
//!
//! let rates = RateTable::from_rates([("USD", 0.012)]);
//! let usd = convert_from_inr(79_990.0, "USD", &rates);
//! assert_eq!(format_currency(usd, "USD", "en-US"), "$960");
//! ```

pub mod currency;
pub mod format;
pub mod rates;
pub mod region;
pub mod resolve;

pub use currency::{CurrencyCode, UnknownCurrency};
pub use format::{LocaleConventions, format_currency, format_manual};
pub use rates::{RateTable, convert_from_inr};
pub use region::{currency_for_region, regions};
pub use resolve::{LocaleHint, Resolution, ResolutionSource, region_from_language, resolve_currency};

/// Name of the cookie carrying the visitor's resolved currency.
///
/// Written by the edge resolver, read by the page-layer client.
pub const CURRENCY_COOKIE: &str = "preferred_currency";

/// Lifetime of the currency cookie: 7 days.
pub const CURRENCY_COOKIE_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;
