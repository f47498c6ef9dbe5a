//! Supported display currencies.
//!
//! # Adding a New Currency
//! Add a line to the `define_currencies!` invocation at the bottom of this
//! file, then map at least one region to it in `region.rs`:
//! ```ignore
//! define_currencies! {
//!     // ... existing currencies ...
//!     CHF => ("CHF", "CHF", "CHF", "de-CH"),
//! }
//! ```

use std::fmt;

/// Error returned when a string is not one of the supported currency codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown currency: {0}")]
pub struct UnknownCurrency(pub String);

/// Macro to define the currency table with auto-generated lookups.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     Name => ("CODE", "international symbol", "home-locale symbol", "home locale"),
/// }
/// ```
///
/// The international symbol is what a formatter shows outside the currency's
/// home region (`A$`), the home symbol is what it shows inside it (`$`).
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $symbol:literal, $home_symbol:literal, $locale:literal)
        ),* $(,)?
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
        #[serde(rename_all = "UPPERCASE")]
        pub enum CurrencyCode {
            $($name),*
        }

        impl CurrencyCode {
            pub fn code(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $code),*
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $symbol),*
                }
            }

            pub fn home_symbol(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $home_symbol),*
                }
            }

            /// BCP-47 locale prices in this currency are presented with.
            pub fn locale(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $locale),*
                }
            }

            pub fn all() -> &'static [CurrencyCode] {
                &[$(CurrencyCode::$name),*]
            }
        }

        impl std::str::FromStr for CurrencyCode {
            type Err = UnknownCurrency;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($code => Ok(CurrencyCode::$name),)*
                    _ => Err(UnknownCurrency(s.to_string())),
                }
            }
        }
    };
}

define_currencies! {
    INR => ("INR", "₹", "₹", "en-IN"),
    USD => ("USD", "$", "$", "en-US"),
    GBP => ("GBP", "£", "£", "en-GB"),
    EUR => ("EUR", "€", "€", "de-DE"),
    AED => ("AED", "AED", "AED", "en-AE"),
    AUD => ("AUD", "A$", "$", "en-AU"),
    CAD => ("CAD", "CA$", "$", "en-CA"),
    SGD => ("SGD", "SGD", "$", "en-SG"),
    JPY => ("JPY", "¥", "￥", "ja-JP"),
}

impl CurrencyCode {
    /// Currency all listed prices are authored in.
    pub const BASE: CurrencyCode = CurrencyCode::INR;

    /// Parses a code, falling back to the base currency for anything unknown.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or(Self::BASE)
    }

    /// Two-letter region of the home locale (`US` for `en-US`).
    pub fn home_region(&self) -> &'static str {
        self.locale().rsplit('-').next().unwrap_or_default()
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::BASE
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_parse() {
        assert_eq!("USD".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert_eq!(" gbp ".parse::<CurrencyCode>().unwrap(), CurrencyCode::GBP);
    }

    #[test]
    fn test_currency_code_parse_unknown() {
        let err = "XYZ".parse::<CurrencyCode>().unwrap_err();
        assert_eq!(err, UnknownCurrency("XYZ".into()));
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(CurrencyCode::parse_or_default("JPY"), CurrencyCode::JPY);
        assert_eq!(CurrencyCode::parse_or_default(""), CurrencyCode::INR);
        assert_eq!(CurrencyCode::parse_or_default("not a code"), CurrencyCode::INR);
    }

    #[test]
    fn test_currency_code_display() {
        assert_eq!(CurrencyCode::USD.to_string(), "USD");
    }

    #[test]
    fn test_default_is_base() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::INR);
        assert_eq!(CurrencyCode::BASE.locale(), "en-IN");
    }

    #[test]
    fn test_home_region() {
        assert_eq!(CurrencyCode::USD.home_region(), "US");
        assert_eq!(CurrencyCode::EUR.home_region(), "DE");
        assert_eq!(CurrencyCode::JPY.home_region(), "JP");
    }

    #[test]
    fn test_serde_uppercase() {
        let json = serde_json::to_string(&CurrencyCode::AED).unwrap();
        assert_eq!(json, "\"AED\"");
        let back: CurrencyCode = serde_json::from_str("\"SGD\"").unwrap();
        assert_eq!(back, CurrencyCode::SGD);
    }

    #[test]
    fn test_currency_code_all() {
        assert_eq!(CurrencyCode::all().len(), 9);
    }
}
