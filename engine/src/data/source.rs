// Interface the analysis core needs from a market data provider
use crate::error::EngineError;
use chrono::{DateTime, Utc};
use shared::models::{Interval, Period, PriceSeries, PriceSnapshot};
use std::collections::HashMap;

/// Price series keyed by normalized symbol. Symbols the provider had no
/// data for are simply absent.
pub type BatchData = HashMap<String, PriceSeries>;

pub trait MarketDataSource: Send + Sync {
    /// Bars for one symbol within `[start, end]`; open bounds are unbounded.
    fn fetch_series(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        interval: Interval,
    ) -> Result<PriceSeries, EngineError>;

    /// Bars covering the trailing `period` for each symbol.
    fn fetch_batch(&self, symbols: &[String], period: Period, interval: Interval) -> BatchData;

    /// Latest price and 52-week range.
    fn fetch_snapshot(&self, symbol: &str) -> Result<PriceSnapshot, EngineError>;
}
