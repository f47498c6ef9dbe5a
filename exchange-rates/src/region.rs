//! Region code to display currency lookup.
//!
//! The table is expanded into a `match` at compile time, so there is no
//! shared map for concurrent requests to observe mid-update.

use crate::CurrencyCode;

macro_rules! define_regions {
    ($($region:literal => $currency:ident),* $(,)?) => {
        /// Looks up the display currency for a two-letter region code.
        ///
        /// Case-insensitive, surrounding whitespace is ignored. Returns `None`
        /// for anything not in the table.
        pub fn currency_for_region(region: &str) -> Option<CurrencyCode> {
            let region = region.trim();
            if region.len() != 2 {
                return None;
            }
            match region.to_ascii_uppercase().as_str() {
                $($region => Some(CurrencyCode::$currency),)*
                _ => None,
            }
        }

        /// Every `(region, currency)` pair in the table.
        pub fn regions() -> &'static [(&'static str, CurrencyCode)] {
            &[$(($region, CurrencyCode::$currency)),*]
        }
    };
}

define_regions! {
    "IN" => INR,
    "US" => USD,
    "GB" => GBP,
    "DE" => EUR,
    "FR" => EUR,
    "IT" => EUR,
    "ES" => EUR,
    "NL" => EUR,
    "IE" => EUR,
    "PT" => EUR,
    "AT" => EUR,
    "BE" => EUR,
    "AE" => AED,
    "AU" => AUD,
    "CA" => CAD,
    "SG" => SGD,
    "JP" => JPY,
}
