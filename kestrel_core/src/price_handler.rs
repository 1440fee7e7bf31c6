// kestrel_core/src/price_handler.rs

use rust_decimal::Decimal;

/// A current market observation for one symbol.
/// Tick-oriented sources quote top-of-book, bar-oriented sources only the
/// last close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceQuote {
    Tick { bid: Decimal, ask: Decimal },
    Bar { close: Decimal },
}

pub trait PriceHandler {
    fn get_last_timestamp(&self, symbol: &str) -> Option<chrono::DateTime<chrono::Utc>>;
    fn get_current_quote(&self, symbol: &str) -> Option<PriceQuote>;
    fn get_current_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>>;
    fn update(&mut self) -> anyhow::Result<()>;
    fn get_continue_backtest(&self) -> bool;
    fn set_continue_backtest(&mut self, value: bool);
}
