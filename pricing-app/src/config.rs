//! Configuration loading from environment.

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderName;

use pricing_hex::inbound::currency::DEFAULT_COUNTRY_HEADERS;
use pricing_hex::inbound::guard::DEFAULT_SESSION_COOKIE;
use pricing_hex::inbound::rate_limit::DEFAULT_REQUESTS_PER_MINUTE;
use pricing_hex::outbound::DEFAULT_FEED_URL;
use pricing_hex::service::DEFAULT_REVALIDATE;

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub rates_upstream_url: String,
    pub rates_revalidate: Duration,
    pub rates_timeout: Duration,
    pub rates_rate_limit_per_minute: u32,
    /// Peers whose `X-Forwarded-For` names the client
    pub trusted_proxies: Vec<IpAddr>,
    pub geo_country_headers: Vec<HeaderName>,
    pub auth_backend_url: String,
    pub auth_backend_key: String,
    pub auth_timeout: Duration,
    pub session_cookie: String,
    pub site_dir: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = parse_or(&var, "PORT", 3000)?;
        let rates_revalidate = parse_or(&var, "RATES_REVALIDATE_SECS", DEFAULT_REVALIDATE.as_secs())?;
        let rates_timeout = parse_or(&var, "RATES_TIMEOUT_SECS", 10)?;
        let rates_rate_limit_per_minute =
            parse_or(&var, "RATES_RATE_LIMIT_PER_MINUTE", DEFAULT_REQUESTS_PER_MINUTE)?;
        let auth_timeout = parse_or(&var, "AUTH_TIMEOUT_SECS", 10)?;
        let trusted_proxies = match var("TRUSTED_PROXIES") {
            Some(list) => parse_ip_list(&list)?,
            None => Vec::new(),
        };

        let geo_country_headers = match var("GEO_COUNTRY_HEADERS") {
            Some(list) => parse_header_names(&list)?,
            None => DEFAULT_COUNTRY_HEADERS
                .iter()
                .copied()
                .map(HeaderName::from_static)
                .collect(),
        };

        let auth_backend_url = var("AUTH_BACKEND_URL")
            .ok_or_else(|| anyhow::anyhow!("AUTH_BACKEND_URL environment variable is required"))?;
        let auth_backend_key = var("AUTH_BACKEND_KEY")
            .ok_or_else(|| anyhow::anyhow!("AUTH_BACKEND_KEY environment variable is required"))?;

        Ok(Self {
            port,
            rates_upstream_url: var("RATES_UPSTREAM_URL")
                .unwrap_or_else(|| DEFAULT_FEED_URL.to_string()),
            rates_revalidate: Duration::from_secs(rates_revalidate),
            rates_timeout: Duration::from_secs(rates_timeout),
            rates_rate_limit_per_minute,
            trusted_proxies,
            geo_country_headers,
            auth_backend_url,
            auth_backend_key,
            auth_timeout: Duration::from_secs(auth_timeout),
            session_cookie: var("SESSION_COOKIE")
                .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string()),
            site_dir: var("SITE_DIR").map(PathBuf::from),
        })
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got {raw:?}")),
        None => Ok(default),
    }
}

/// `"x-vercel-ip-country, cf-ipcountry"` to header names, in order.
fn parse_header_names(list: &str) -> anyhow::Result<Vec<HeaderName>> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            HeaderName::from_bytes(name.to_ascii_lowercase().as_bytes())
                .with_context(|| format!("GEO_COUNTRY_HEADERS has an invalid header name {name:?}"))
        })
        .collect()
}

/// `"10.0.0.1, 10.0.0.2"` to addresses.
fn parse_ip_list(list: &str) -> anyhow::Result<Vec<IpAddr>> {
    list.split(',')
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(|addr| {
            addr.parse()
                .with_context(|| format!("TRUSTED_PROXIES has an invalid address {addr:?}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("AUTH_BACKEND_URL", "https://auth.example.com"),
        ("AUTH_BACKEND_KEY", "service-key"),
    ];

    #[test]
    fn test_defaults() {
        let config = config_from(&REQUIRED).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.rates_upstream_url, DEFAULT_FEED_URL);
        assert_eq!(config.rates_revalidate, Duration::from_secs(43_200));
        assert_eq!(config.rates_timeout, Duration::from_secs(10));
        assert_eq!(config.rates_rate_limit_per_minute, 120);
        assert!(config.trusted_proxies.is_empty());
        assert_eq!(config.auth_timeout, Duration::from_secs(10));
        assert_eq!(config.session_cookie, "sb-access-token");
        assert_eq!(
            config.geo_country_headers,
            vec![
                HeaderName::from_static("x-vercel-ip-country"),
                HeaderName::from_static("cf-ipcountry")
            ]
        );
        assert!(config.site_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PORT", "8080"),
            ("RATES_REVALIDATE_SECS", "60"),
            ("GEO_COUNTRY_HEADERS", "X-Geo-Country, cf-ipcountry"),
            ("SITE_DIR", "./out"),
            ("RATES_TIMEOUT_SECS", "3"),
            ("AUTH_TIMEOUT_SECS", "20"),
            ("TRUSTED_PROXIES", "10.0.0.1, ::1"),
        ]);
        let config = config_from(&pairs).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rates_revalidate, Duration::from_secs(60));
        assert_eq!(config.geo_country_headers[0].as_str(), "x-geo-country");
        assert_eq!(config.site_dir, Some(PathBuf::from("./out")));
        assert_eq!(config.rates_timeout, Duration::from_secs(3));
        assert_eq!(config.auth_timeout, Duration::from_secs(20));
        assert_eq!(
            config.trusted_proxies,
            vec![
                "10.0.0.1".parse::<IpAddr>().unwrap(),
                "::1".parse::<IpAddr>().unwrap()
            ]
        );
    }

    #[test]
    fn test_invalid_trusted_proxy_is_error() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("TRUSTED_PROXIES", "10.0.0.1, proxy.internal"));
        let err = config_from(&pairs).unwrap_err();
        assert!(err.to_string().contains("TRUSTED_PROXIES"));
    }

    #[test]
    fn test_missing_auth_backend_is_error() {
        let err = config_from(&[("AUTH_BACKEND_KEY", "k")]).unwrap_err();
        assert!(err.to_string().contains("AUTH_BACKEND_URL"));
    }

    #[test]
    fn test_invalid_number_is_error() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));
        assert!(config_from(&pairs).is_err());
    }

    #[test]
    fn test_invalid_header_name_is_error() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("GEO_COUNTRY_HEADERS", "bad header"));
        assert!(config_from(&pairs).is_err());
    }
}
