//! Domain models for the pricing service.

pub mod price;
pub mod session;

pub use price::{DisplayPrice, PriceAmount, PriceItem};
pub use session::{Role, Session};
