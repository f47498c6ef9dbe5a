//! Listed prices and their visitor-facing rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

use exchange_rates::{CurrencyCode, RateTable, convert_from_inr, format_currency};

use crate::error::DomainError;

/// A listed price in the base currency (INR).
///
/// Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PriceAmount(f64);

impl PriceAmount {
    /// Creates a new price amount.
    pub fn new(amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() {
            return Err(DomainError::InvalidAmount(amount.to_string()));
        }
        if amount < 0.0 {
            return Err(DomainError::NegativeAmount);
        }
        Ok(Self(amount))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for PriceAmount {
    type Error = DomainError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<PriceAmount> for f64 {
    fn from(amount: PriceAmount) -> Self {
        amount.0
    }
}

/// An entry of a static pricing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceItem {
    pub label: String,
    pub amount: PriceAmount,
}

impl PriceItem {
    pub fn new(label: impl Into<String>, amount: PriceAmount) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// A price converted into the visitor's currency and formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPrice {
    pub currency: CurrencyCode,
    pub amount: f64,
    pub formatted: String,
}

impl DisplayPrice {
    /// Converts and formats `price` for `currency`.
    ///
    /// A missing rate leaves the amount unchanged; see [`convert_from_inr`].
    pub fn compute(price: PriceAmount, currency: CurrencyCode, rates: &RateTable) -> Self {
        let amount = convert_from_inr(price.value(), currency.code(), rates);
        Self {
            currency,
            amount,
            formatted: format_currency(amount, currency.code(), currency.locale()),
        }
    }

    /// The base-currency rendering shown until rates are available.
    pub fn placeholder(price: PriceAmount) -> Self {
        let currency = CurrencyCode::BASE;
        Self {
            currency,
            amount: price.value(),
            formatted: format_currency(price.value(), currency.code(), currency.locale()),
        }
    }
}

impl fmt::Display for DisplayPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted)
    }
}
