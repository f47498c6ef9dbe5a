//! Whole-unit price formatting.
//!
//! Covers the conventions of the locales this site actually presents prices
//! in. Unknown locales use `en-US` conventions; an unsupported currency code
//! falls back to `"<CODE> 1,234"`.

use crate::CurrencyCode;

const NBSP: &str = "\u{a0}";
const NARROW_NBSP: &str = "\u{202f}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    /// 1,234,567
    Thousands,
    /// 12,34,567
    Indian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPosition {
    Prefix,
    /// Prefix separated by a no-break space (`€ 1.234`).
    SpacedPrefix,
    /// Suffix separated by a no-break space (`1.234 €`).
    Suffix,
}

/// Digit grouping and symbol placement for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleConventions {
    group_separator: &'static str,
    grouping: Grouping,
    position: SymbolPosition,
    /// Digits required beyond the first group before grouping kicks in
    /// (`es` leaves `1234` alone).
    min_grouping_digits: usize,
    region: Option<&'static str>,
}

impl LocaleConventions {
    const EN: LocaleConventions = LocaleConventions {
        group_separator: ",",
        grouping: Grouping::Thousands,
        position: SymbolPosition::Prefix,
        min_grouping_digits: 1,
        region: None,
    };

    /// Conventions for a BCP-47 tag such as `de-DE` or `en_IN`.
    pub fn for_locale(locale: &str) -> Self {
        let mut parts = locale.trim().split(['-', '_']);
        let language = parts.next().unwrap_or_default().to_ascii_lowercase();
        let region = parts
            .find(|part| part.len() == 2)
            .map(|part| part.to_ascii_uppercase());

        let mut conventions = match language.as_str() {
            "de" | "it" => Self {
                group_separator: ".",
                position: SymbolPosition::Suffix,
                ..Self::EN
            },
            "es" | "pt" => Self {
                group_separator: ".",
                position: SymbolPosition::Suffix,
                min_grouping_digits: 2,
                ..Self::EN
            },
            "fr" => Self {
                group_separator: NARROW_NBSP,
                position: SymbolPosition::Suffix,
                ..Self::EN
            },
            "nl" => Self {
                group_separator: ".",
                position: SymbolPosition::SpacedPrefix,
                ..Self::EN
            },
            _ => Self::EN,
        };

        conventions.region = region.as_deref().and_then(known_region);
        if conventions.region == Some("IN") {
            conventions.grouping = Grouping::Indian;
        }
        conventions
    }

    fn symbol_for(&self, currency: CurrencyCode) -> &'static str {
        if self.region == Some(currency.home_region()) {
            currency.home_symbol()
        } else {
            currency.symbol()
        }
    }

    fn group(&self, digits: &str) -> String {
        group_digits(
            digits,
            self.group_separator,
            self.grouping,
            self.min_grouping_digits,
        )
    }
}

/// Interns the region so conventions stay `Copy`.
fn known_region(region: &str) -> Option<&'static str> {
    crate::regions()
        .iter()
        .map(|(r, _)| *r)
        .find(|r| *r == region)
}

fn group_digits(
    digits: &str,
    separator: &str,
    grouping: Grouping,
    min_grouping_digits: usize,
) -> String {
    if digits.len() <= 3 + min_grouping_digits.saturating_sub(1) {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let step = match grouping {
        Grouping::Thousands => 3,
        Grouping::Indian => 2,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(step);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(tail);
    groups.join(separator)
}

/// Rounds to whole units and splits off the sign. Non-finite amounts are 0.
fn whole_units(amount: f64) -> (bool, String) {
    if !amount.is_finite() {
        return (false, "0".to_string());
    }
    let rounded = amount.round();
    let negative = rounded < 0.0;
    (negative, format!("{:.0}", rounded.abs()))
}

/// Formats `amount` of `currency_code` for `locale` with zero decimals.
///
/// Never fails: a code outside the supported table is rendered with
/// [`format_manual`].
pub fn format_currency(amount: f64, currency_code: &str, locale: &str) -> String {
    let Ok(currency) = currency_code.parse::<CurrencyCode>() else {
        return format_manual(amount, currency_code);
    };

    let conventions = LocaleConventions::for_locale(locale);
    let (negative, digits) = whole_units(amount);
    let number = conventions.group(&digits);
    let symbol = conventions.symbol_for(currency);
    let sign = if negative { "-" } else { "" };

    match conventions.position {
        SymbolPosition::Prefix if symbol.chars().all(|c| c.is_ascii_alphabetic()) => {
            format!("{sign}{symbol}{NBSP}{number}")
        }
        SymbolPosition::Prefix => format!("{sign}{symbol}{number}"),
        SymbolPosition::SpacedPrefix => format!("{symbol}{NBSP}{sign}{number}"),
        SymbolPosition::Suffix => format!("{sign}{number}{NBSP}{symbol}"),
    }
}

/// `"<CODE> <rounded, comma-grouped integer>"`, used when locale formatting
/// is not possible.
pub fn format_manual(amount: f64, currency_code: &str) -> String {
    let (negative, digits) = whole_units(amount);
    let number = group_digits(&digits, ",", Grouping::Thousands, 1);
    let sign = if negative { "-" } else { "" };
    format!("{} {sign}{number}", currency_code.trim())
}
