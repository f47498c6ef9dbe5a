//! Rate limiting using Governor.
//!
//! Limits `/api/rates` per client so a busy crawler cannot drain the
//! upstream feed's quota through the proxy. A limited client still gets a
//! 200: the cached table, or a fallback tagged `rate_limited`.

use std::net::IpAddr;
use std::num::NonZeroU32;

use axum::http::HeaderMap;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

/// Default allowance per client.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 120;

/// Reason served to a client over its allowance when nothing is cached.
pub const RATE_LIMITED_REASON: &str = "rate_limited";

/// Key shared by requests whose peer address is unknown.
const UNKNOWN_CLIENT: &str = "unknown";

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    limiter: DefaultKeyedRateLimiter<String>,
    /// Peers allowed to name the client in `X-Forwarded-For`
    trusted_proxies: Vec<IpAddr>,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTS_PER_MINUTE)
    }
}

impl RateLimiterState {
    /// Creates a new rate limiter state allowing `requests_per_minute` per
    /// client, with the full allowance available as a burst. Zero is
    /// treated as one.
    pub fn new(requests_per_minute: u32) -> Self {
        let requests = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(requests)),
            trusted_proxies: Vec::new(),
        }
    }

    pub fn with_trusted_proxies(mut self, proxies: impl IntoIterator<Item = IpAddr>) -> Self {
        self.trusted_proxies = proxies.into_iter().collect();
        self
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        self.limiter.check_key(&key.to_string()).is_ok()
    }

    /// Client identity for limiting.
    ///
    /// The peer address, unless the peer is a trusted proxy: then the first
    /// parseable `X-Forwarded-For` hop. Headers from untrusted peers are
    /// ignored.
    pub fn client_key(&self, headers: &HeaderMap, peer: Option<IpAddr>) -> String {
        let Some(peer) = peer else {
            return UNKNOWN_CLIENT.to_string();
        };

        if self.trusted_proxies.contains(&peer) {
            let forwarded = headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|v| v.split(',').next())
                .and_then(|hop| hop.trim().parse::<IpAddr>().ok());
            if let Some(client) = forwarded {
                return client.to_string();
            }
        }

        peer.to_string()
    }

    /// Drops clients whose allowance has fully refilled.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}
