//! Page-layer currency lookup.
//!
//! Trusts the cookie written by the edge resolver; without one, repeats the
//! locale guess from the browser language using the shared resolver.

use cookie::Cookie;
use exchange_rates::{CURRENCY_COOKIE, CurrencyCode, LocaleHint};

/// Currency for this page load. Never fails: an absent or unparseable
/// cookie degrades to the language guess, and that to `INR`.
pub fn resolve_currency(cookie: Option<&str>, navigator_language: Option<&str>) -> CurrencyCode {
    if let Some(currency) = cookie.and_then(|value| value.parse::<CurrencyCode>().ok()) {
        return currency;
    }

    exchange_rates::resolve_currency(LocaleHint::from_language(navigator_language)).currency
}

/// Extracts the currency cookie value from a raw `Cookie` header.
/// Malformed pairs are skipped.
pub fn cookie_value(header: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == CURRENCY_COOKIE)
        .map(|cookie| cookie.value_trimmed().to_string())
}

/// [`resolve_currency`] over a raw `Cookie` header.
pub fn currency_from_cookie_header(
    header: Option<&str>,
    navigator_language: Option<&str>,
) -> CurrencyCode {
    let cookie = header.and_then(cookie_value);
    resolve_currency(cookie.as_deref(), navigator_language)
}
