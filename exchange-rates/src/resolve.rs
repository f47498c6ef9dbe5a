//! Visitor currency resolution.
//!
//! One pure function serves both adapters: the HTTP edge passes the CDN
//! country header and `Accept-Language`, the page-layer client passes the
//! browser language only.

use serde::{Deserialize, Serialize};

use crate::{CurrencyCode, currency_for_region};

/// Region and language signals available for a visitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocaleHint<'a> {
    /// Two-letter country code, e.g. from a CDN geo header.
    pub country: Option<&'a str>,
    /// `Accept-Language` header or a browser language tag.
    pub language: Option<&'a str>,
}

impl<'a> LocaleHint<'a> {
    pub fn new(country: Option<&'a str>, language: Option<&'a str>) -> Self {
        Self { country, language }
    }

    pub fn from_language(language: Option<&'a str>) -> Self {
        Self {
            country: None,
            language,
        }
    }
}

/// Which signal decided the currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Country,
    Language,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub currency: CurrencyCode,
    pub source: ResolutionSource,
}

impl Resolution {
    pub fn fallback() -> Self {
        Self {
            currency: CurrencyCode::BASE,
            source: ResolutionSource::Default,
        }
    }
}

/// Extracts the region sub-tag of the first language tag.
///
/// `"fr-FR,fr;q=0.9"` gives `FR`, `"en"` gives `None`. Only the text between
/// the first hyphen and the next hyphen or `;` is considered.
pub fn region_from_language(language: &str) -> Option<String> {
    let first = language.split(',').next()?;
    let first = first.split(';').next()?;
    let (_, rest) = first.split_once('-')?;
    let region = rest.split('-').next()?.trim();
    if region.is_empty() {
        return None;
    }
    Some(region.to_ascii_uppercase())
}

/// Resolves the display currency. First match wins:
/// 1. a known country code,
/// 2. the region of the first language tag,
/// 3. the base currency.
pub fn resolve_currency(hint: LocaleHint<'_>) -> Resolution {
    if let Some(currency) = hint.country.and_then(currency_for_region) {
        return Resolution {
            currency,
            source: ResolutionSource::Country,
        };
    }

    if let Some(currency) = hint
        .language
        .and_then(region_from_language)
        .and_then(|region| currency_for_region(&region))
    {
        return Resolution {
            currency,
            source: ResolutionSource::Language,
        };
    }

    Resolution::fallback()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions;

    #[test]
    fn test_every_region_resolves_by_country() {
        for (region, currency) in regions() {
            let resolution = resolve_currency(LocaleHint::new(Some(*region), None));
            assert_eq!(resolution.currency, *currency, "region {}", region);
            assert_eq!(resolution.source, ResolutionSource::Country);
        }
    }

    #[test]
    fn test_country_header_de() {
        let resolution = resolve_currency(LocaleHint::new(Some("DE"), None));
        assert_eq!(resolution.currency, CurrencyCode::EUR);
    }

    #[test]
    fn test_accept_language_fr() {
        let resolution = resolve_currency(LocaleHint::new(None, Some("fr-FR,fr;q=0.9")));
        assert_eq!(resolution.currency, CurrencyCode::EUR);
        assert_eq!(resolution.source, ResolutionSource::Language);
    }

    #[test]
    fn test_country_wins_over_language() {
        let resolution = resolve_currency(LocaleHint::new(Some("GB"), Some("en-US")));
        assert_eq!(resolution.currency, CurrencyCode::GBP);
    }

    #[test]
    fn test_unknown_country_falls_through_to_language() {
        let resolution = resolve_currency(LocaleHint::new(Some("ZZ"), Some("en-AU")));
        assert_eq!(resolution.currency, CurrencyCode::AUD);
        assert_eq!(resolution.source, ResolutionSource::Language);
    }

    #[test]
    fn test_nothing_matches_gives_inr() {
        assert_eq!(resolve_currency(LocaleHint::default()), Resolution::fallback());
        assert_eq!(
            resolve_currency(LocaleHint::new(Some("XX"), Some("pt-BR"))).currency,
            CurrencyCode::INR
        );
        assert_eq!(
            resolve_currency(LocaleHint::from_language(Some("en"))).currency,
            CurrencyCode::INR
        );
    }

    #[test]
    fn test_malformed_language_never_panics() {
        for input in ["", ",", "-", "--", ";q=1", "é-ü", "en-", "-US", "\u{0}"] {
            let _ = resolve_currency(LocaleHint::from_language(Some(input)));
        }
        assert_eq!(
            resolve_currency(LocaleHint::from_language(Some("-US"))).currency,
            CurrencyCode::USD
        );
    }

    #[test]
    fn test_region_from_language() {
        assert_eq!(region_from_language("fr-FR,fr;q=0.9"), Some("FR".into()));
        assert_eq!(region_from_language("en-gb"), Some("GB".into()));
        assert_eq!(region_from_language("en-US;q=0.8"), Some("US".into()));
        assert_eq!(region_from_language("zh-Hant-TW"), Some("HANT".into()));
        assert_eq!(region_from_language("de"), None);
        assert_eq!(region_from_language("de,en-US"), None);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let hint = LocaleHint::new(None, Some("ja-JP"));
        assert_eq!(resolve_currency(hint), resolve_currency(hint));
    }
}
