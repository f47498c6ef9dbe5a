//! # Pricing Hex
//!
//! Application service, HTTP adapter and outbound adapters for the visitor
//! pricing service.
//!
//! ## Architecture
//!
//! - `service/` - Rate service (upstream table with revalidation window)
//! - `inbound/` - HTTP adapter (Axum server, edge currency resolver, route guard)
//! - `outbound/` - Upstream rate feed and hosted auth backend clients
//!
//! The service is generic over `F: RateFeed` and the guard over
//! `A: AuthBackend`, so adapters are injected at compile time.

pub mod inbound;
pub mod openapi;
pub mod outbound;
pub mod service;


pub use service::RateService;
