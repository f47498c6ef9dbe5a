//! Edge currency resolver middleware.
//!
//! Runs on every request except static assets and the rates route, decides
//! the visitor's display currency from a CDN country header or
//! `Accept-Language`, and (re)writes the currency cookie on the response.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, Request, header::ACCEPT_LANGUAGE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use exchange_rates::{
    CURRENCY_COOKIE, CURRENCY_COOKIE_MAX_AGE_SECS, CurrencyCode, LocaleHint, Resolution,
    resolve_currency,
};

use super::RATES_PATH;

/// Country headers injected by common CDNs, checked in order.
pub const DEFAULT_COUNTRY_HEADERS: &[&str] = &["x-vercel-ip-country", "cf-ipcountry"];

const EXCLUDED_PREFIXES: &[&str] = &[
    "/_next/static",
    "/_next/image",
    "/static/",
    "/assets/",
    "/favicon.ico",
];

const ASSET_EXTENSIONS: &[&str] = &[
    "css", "js", "map", "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "woff", "woff2", "ttf",
    "txt", "xml",
];

/// Reads the request signals and runs the shared resolver.
#[derive(Debug, Clone)]
pub struct CurrencyResolver {
    country_headers: Vec<HeaderName>,
}

impl Default for CurrencyResolver {
    fn default() -> Self {
        Self::new(
            DEFAULT_COUNTRY_HEADERS
                .iter()
                .copied()
                .map(HeaderName::from_static),
        )
    }
}

impl CurrencyResolver {
    pub fn new(country_headers: impl IntoIterator<Item = HeaderName>) -> Self {
        Self {
            country_headers: country_headers.into_iter().collect(),
        }
    }

    /// The first non-empty country header is used; values that are not
    /// valid UTF-8 count as absent.
    pub fn resolve(&self, headers: &HeaderMap) -> Resolution {
        let country = self.country_headers.iter().find_map(|name| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        });

        let language = headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());

        resolve_currency(LocaleHint::new(country, language))
    }
}

/// `preferred_currency=<CODE>; Path=/; Max-Age=604800; SameSite=Lax`,
/// readable from scripts.
pub fn currency_cookie(currency: CurrencyCode) -> Cookie<'static> {
    Cookie::build((CURRENCY_COOKIE, currency.code()))
        .path("/")
        .max_age(time::Duration::seconds(CURRENCY_COOKIE_MAX_AGE_SECS))
        .same_site(SameSite::Lax)
        .http_only(false)
        .build()
}

/// Static assets and the rates route skip currency resolution.
pub fn is_excluded_path(path: &str) -> bool {
    if path == RATES_PATH || path.starts_with("/api/rates/") {
        return true;
    }

    if EXCLUDED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return true;
    }

    let file = path.rsplit('/').next().unwrap_or_default();
    file.rsplit_once('.').is_some_and(|(_, ext)| {
        ASSET_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    })
}

/// Currency middleware.
///
/// The cookie is written on every matched request, even when its value is
/// unchanged. The resolution is also stored in request extensions.
pub async fn currency_middleware(
    State(resolver): State<Arc<CurrencyResolver>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if is_excluded_path(request.uri().path()) {
        return next.run(request).await;
    }

    let resolution = resolver.resolve(request.headers());
    tracing::debug!(
        currency = %resolution.currency,
        source = ?resolution.source,
        "resolved visitor currency"
    );
    request.extensions_mut().insert(resolution);

    let response = next.run(request).await;
    let jar = CookieJar::new().add(currency_cookie(resolution.currency));
    (jar, response).into_response()
}
