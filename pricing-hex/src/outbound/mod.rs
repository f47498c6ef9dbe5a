//! Outbound adapters: clients for the upstream rate feed and the hosted
//! auth backend.

mod hosted_auth;
mod open_er_api;

pub use hosted_auth::HostedAuth;
pub use open_er_api::{DEFAULT_FEED_URL, OpenErApiFeed};
