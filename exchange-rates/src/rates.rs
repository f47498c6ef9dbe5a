//! Base-INR exchange rate table and conversion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::CurrencyCode;

/// Multipliers from the base currency: `rates["USD"]` is how many dollars one
/// rupee buys.
///
/// Always holds `INR = 1`; every constructor (including deserialization)
/// enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct RateTable {
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// The minimal table `{INR: 1}`.
    pub fn base_only() -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(CurrencyCode::BASE.code().to_string(), 1.0);
        Self { rates }
    }

    /// Builds a table from raw upstream entries.
    ///
    /// Codes are upper-cased; entries that are not finite and strictly
    /// positive are dropped. The base entry is always reset to 1.
    pub fn from_rates<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut table = Self::base_only();
        for (code, rate) in entries {
            let code = code.as_ref().trim().to_ascii_uppercase();
            if code.is_empty() || code == CurrencyCode::BASE.code() {
                continue;
            }
            if rate.is_finite() && rate > 0.0 {
                table.rates.insert(code, rate);
            }
        }
        table
    }

    /// Rate for `code`, case-insensitive.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(&code.trim().to_ascii_uppercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Never true: the base entry is always present.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::base_only()
    }
}

impl From<BTreeMap<String, f64>> for RateTable {
    fn from(rates: BTreeMap<String, f64>) -> Self {
        Self::from_rates(rates)
    }
}

impl From<RateTable> for BTreeMap<String, f64> {
    fn from(table: RateTable) -> Self {
        table.rates
    }
}

/// Converts a base-currency amount into `to`.
///
/// When the table has no usable rate for `to` (missing, zero, negative or
/// not finite) the amount is returned unchanged, so pricing still renders.
pub fn convert_from_inr(amount: f64, to: &str, rates: &RateTable) -> f64 {
    match rates.rate(to) {
        Some(rate) if rate.is_finite() && rate > 0.0 => amount * rate,
        _ => amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_only() {
        let table = RateTable::base_only();
        assert_eq!(table.rate("INR"), Some(1.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_from_rates_forces_base_and_filters() {
        let table = RateTable::from_rates([
            ("inr", 2.0),
            ("usd", 0.012),
            ("EUR", 0.0),
            ("GBP", -1.0),
            ("JPY", f64::NAN),
            ("AUD", f64::INFINITY),
        ]);
        assert_eq!(table.rate("INR"), Some(1.0));
        assert_eq!(table.rate("USD"), Some(0.012));
        assert_eq!(table.rate("EUR"), None);
        assert_eq!(table.rate("GBP"), None);
        assert_eq!(table.rate("JPY"), None);
        assert_eq!(table.rate("AUD"), None);
    }

    #[test]
    fn test_deserialize_keeps_base() {
        let table: RateTable = serde_json::from_str(r#"{"USD": 0.012}"#).unwrap();
        assert_eq!(table.rate("INR"), Some(1.0));
        assert_eq!(table.rate("usd"), Some(0.012));
    }

    #[test]
    fn test_serialize_as_plain_object() {
        let table = RateTable::from_rates([("USD", 0.5)]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, serde_json::json!({"INR": 1.0, "USD": 0.5}));
    }

    #[test]
    fn test_convert_usd() {
        let table = RateTable::from_rates([("USD", 0.012)]);
        let usd = convert_from_inr(79_990.0, "USD", &table);
        assert!((usd - 959.88).abs() < 1e-9);
    }

    #[test]
    fn test_convert_inr_is_identity() {
        let table = RateTable::base_only();
        for amount in [0.0, 1.0, 100.0, 79_990.0, 1e12] {
            assert_eq!(convert_from_inr(amount, "INR", &table), amount);
        }
    }

    #[test]
    fn test_convert_missing_rate_is_identity() {
        let table = RateTable::base_only();
        assert_eq!(convert_from_inr(100.0, "USD", &table), 100.0);
        assert_eq!(convert_from_inr(100.0, "", &table), 100.0);
        assert_eq!(convert_from_inr(100.0, "not-a-code", &table), 100.0);
    }

    #[test]
    fn test_convert_unusable_rate_is_identity() {
        // from_rates filters these; build the map directly to bypass it.
        let mut rates = BTreeMap::new();
        rates.insert("INR".to_string(), 1.0);
        rates.insert("ZER".to_string(), 0.0);
        rates.insert("NAN".to_string(), f64::NAN);
        let table = RateTable { rates };
        assert_eq!(convert_from_inr(42.0, "ZER", &table), 42.0);
        assert_eq!(convert_from_inr(42.0, "NAN", &table), 42.0);
    }
}
