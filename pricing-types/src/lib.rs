//! # Pricing Types
//!
//! Domain types and port traits for the visitor pricing service.
//! This crate has no IO dependencies - only data structures, rules, and
//! trait definitions.
//!
//! ## Architecture
//!
//! This crate is the **innermost core** of the hexagonal architecture:
//! - `domain/` - Price amounts, display prices, sessions and roles
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Wire shapes for the rates proxy and the upstream feed
//! - `error/` - Domain, adapter and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{DisplayPrice, PriceAmount, PriceItem, Role, Session};
pub use dto::*;
pub use error::{AppError, AuthError, DomainError, FeedError};
pub use exchange_rates::{CurrencyCode, RateTable};
pub use ports::{AuthBackend, RateFeed};
