//! Per-page-load price rendering state.
//!
//! `Uninitialized -> ResolvingCurrency -> FetchingRates -> Ready`. Until
//! `Ready`, every price renders in INR. There is no error state: a failed
//! fetch reaches `Ready` with the fallback table.

use exchange_rates::CurrencyCode;
use pricing_types::{DisplayPrice, PriceAmount, PriceItem, RatesResponse};

use crate::RatesSource;
use crate::currency::resolve_currency;

#[derive(Debug, Clone, PartialEq)]
pub enum BoardState {
    Uninitialized,
    ResolvingCurrency,
    FetchingRates { currency: CurrencyCode },
    Ready {
        currency: CurrencyCode,
        rates: RatesResponse,
    },
}

/// Converts listed prices once the currency and rates are known.
pub struct PriceBoard<S: RatesSource> {
    source: S,
    state: BoardState,
}

impl<S: RatesSource> PriceBoard<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: BoardState::Uninitialized,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, BoardState::Ready { .. })
    }

    /// Picks the display currency from the cookie or the browser language.
    /// Only acts on an uninitialized board.
    pub fn resolve_currency(&mut self, cookie: Option<&str>, navigator_language: Option<&str>) {
        if self.state != BoardState::Uninitialized {
            return;
        }

        self.state = BoardState::ResolvingCurrency;
        let currency = resolve_currency(cookie, navigator_language);
        tracing::debug!(%currency, "page currency resolved");
        self.state = BoardState::FetchingRates { currency };
    }

    /// Fetches the table and moves to `Ready`. Only acts while fetching.
    pub async fn fetch_rates(&mut self) {
        let BoardState::FetchingRates { currency } = self.state else {
            return;
        };

        let rates = self.source.fetch_rates().await;
        if let Some(reason) = rates.error.as_deref() {
            tracing::debug!(reason, "rendering with fallback rates");
        }
        self.state = BoardState::Ready { currency, rates };
    }

    /// Runs the whole page-load sequence.
    pub async fn load(&mut self, cookie: Option<&str>, navigator_language: Option<&str>) {
        self.resolve_currency(cookie, navigator_language);
        self.fetch_rates().await;
    }

    /// Converted price in `Ready`, the INR placeholder before that.
    pub fn render(&self, price: PriceAmount) -> DisplayPrice {
        match &self.state {
            BoardState::Ready { currency, rates } => {
                DisplayPrice::compute(price, *currency, &rates.rates)
            }
            _ => DisplayPrice::placeholder(price),
        }
    }

    /// Renders a pricing table, keeping each label with its price.
    pub fn render_items<'a>(&self, items: &'a [PriceItem]) -> Vec<(&'a str, DisplayPrice)> {
        items
            .iter()
            .map(|item| (item.label.as_str(), self.render(item.amount)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use exchange_rates::RateTable;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedRates {
        response: RatesResponse,
        calls: AtomicUsize,
    }

    impl FixedRates {
        fn new(response: RatesResponse) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RatesSource for FixedRates {
        async fn fetch_rates(&self) -> RatesResponse {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    fn usd_table() -> RatesResponse {
        RatesResponse::new(RateTable::from_rates([("INR", 1.0), ("USD", 0.012)]), None)
    }

    fn price(amount: f64) -> PriceAmount {
        PriceAmount::new(amount).unwrap()
    }

    #[test]
    fn test_placeholder_before_ready() {
        let mut board = PriceBoard::new(FixedRates::new(usd_table()));
        assert_eq!(board.state(), &BoardState::Uninitialized);
        assert_eq!(board.render(price(79_990.0)).formatted, "₹79,990");

        board.resolve_currency(Some("USD"), None);
        assert_eq!(
            board.state(),
            &BoardState::FetchingRates {
                currency: CurrencyCode::USD
            }
        );
        assert_eq!(board.render(price(79_990.0)).currency, CurrencyCode::INR);
    }

    #[tokio::test]
    async fn test_ready_converts_usd() {
        let mut board = PriceBoard::new(FixedRates::new(usd_table()));
        board.load(Some("USD"), None).await;

        assert!(board.is_ready());
        let display = board.render(price(79_990.0));
        assert_eq!(display.currency, CurrencyCode::USD);
        assert_eq!(display.formatted, "$960");
    }

    #[tokio::test]
    async fn test_fallback_rates_render_unchanged_amount() {
        let mut board = PriceBoard::new(FixedRates::new(RatesResponse::fallback("upstream")));
        board.load(None, None).await;

        assert!(board.is_ready());
        assert_eq!(board.render(price(100.0)).formatted, "₹100");
    }

    #[tokio::test]
    async fn test_missing_rate_keeps_amount() {
        let mut board = PriceBoard::new(FixedRates::new(usd_table()));
        board.load(None, Some("de-DE")).await;

        let display = board.render(price(500.0));
        assert_eq!(display.currency, CurrencyCode::EUR);
        assert_eq!(display.amount, 500.0);
    }

    #[tokio::test]
    async fn test_load_runs_once() {
        let mut board = PriceBoard::new(FixedRates::new(usd_table()));
        board.load(Some("USD"), None).await;
        board.load(Some("GBP"), None).await;

        assert_eq!(board.source.calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            board.state(),
            BoardState::Ready {
                currency: CurrencyCode::USD,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_render_items_keeps_labels() {
        let items = [
            PriceItem::new("Starter", price(4_999.0)),
            PriceItem::new("Pro", price(79_990.0)),
        ];

        let mut board = PriceBoard::new(FixedRates::new(usd_table()));
        let before: Vec<_> = board
            .render_items(&items)
            .into_iter()
            .map(|(label, display)| (label, display.formatted))
            .collect();
        assert_eq!(before, [("Starter", "₹4,999".to_string()), ("Pro", "₹79,990".to_string())]);

        board.load(Some("USD"), None).await;
        let after = board.render_items(&items);
        assert_eq!(after[0].0, "Starter");
        assert_eq!(after[1].1.formatted, "$960");
    }

    #[tokio::test]
    async fn test_fetch_before_resolve_is_ignored() {
        let mut board = PriceBoard::new(FixedRates::new(usd_table()));
        board.fetch_rates().await;
        assert_eq!(board.state(), &BoardState::Uninitialized);
    }
}
