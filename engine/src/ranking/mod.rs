//! Batch rankers.
//!
//! Every ranker walks a set of tickers over pre-fetched data, evaluates each
//! one to either a row or a [`SkipReason`], and sorts the rows. One ticker
//! failing never stops the batch; the skips are returned next to the rows.

pub mod buy_zone;
pub mod ceiling_scan;
pub mod movers;
pub mod universe_scan;

pub use buy_zone::{scan_buy_zone, BuyZoneRow};
pub use ceiling_scan::{scan_ceiling, CeilingRow};
pub use movers::{rank_movers, MoverRow};
pub use universe_scan::{scan_universe, UniverseRow, ZoneStatus};

use crate::analysis::directional::{self, DirectionalEstimate};
use crate::data::sanitizer::sanitize_daily;
use crate::data::BatchData;
use crate::error::EngineError;
use crate::indicators::IndicatorFrame;
use serde::Serialize;
use shared::models::PriceSeries;
use shared::utils::normalize_symbol;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkipReason {
    InsufficientData,
    MissingFundamentals,
    RetrievalFailure,
    NotQualified,
    Undefined,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::InsufficientData => "insufficient data",
            SkipReason::MissingFundamentals => "missing fundamentals",
            SkipReason::RetrievalFailure => "retrieval failure",
            SkipReason::NotQualified => "not qualified",
            SkipReason::Undefined => "undefined values",
        };
        f.write_str(s)
    }
}

impl From<&EngineError> for SkipReason {
    fn from(err: &EngineError) -> Self {
        match err {
            EngineError::InsufficientData { .. } => SkipReason::InsufficientData,
            EngineError::MissingFundamentals(_) => SkipReason::MissingFundamentals,
            _ => SkipReason::RetrievalFailure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub group: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport<T> {
    pub rows: Vec<T>,
    pub skipped: Vec<SkippedTicker>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub(crate) fn record(&mut self, ticker: &str, group: &str, outcome: Result<T, SkipReason>) {
        match outcome {
            Ok(row) => self.rows.push(row),
            Err(reason) => {
                tracing::debug!(ticker = %ticker, group = %group, %reason, "Ticker skipped");
                self.skipped.push(SkippedTicker {
                    ticker: ticker.to_string(),
                    group: group.to_string(),
                    reason,
                });
            }
        }
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Latest daily readings shared by the buy-zone and universe scans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DailyReading {
    pub price: f64,
    pub ma20: f64,
    pub ma50: f64,
    pub rsi14: f64,
    pub estimate: DirectionalEstimate,
}

impl DailyReading {
    /// Oversold, or the short average above the long one.
    pub fn in_buy_zone(&self) -> bool {
        self.rsi14 < 30.0 || self.ma20 > self.ma50
    }
}

/// Price and moving averages come from the full sanitized series; RSI and the
/// directional estimate from the rows where RSI14 is defined.
pub(crate) fn daily_reading(series: &PriceSeries) -> Result<DailyReading, SkipReason> {
    let candles = sanitize_daily(series).map_err(|e| SkipReason::from(&e))?;
    let frame = IndicatorFrame::compute(candles);
    let rsi_rows = frame.with_defined_rsi();
    match (frame.last_close(), frame.last_ma20(), frame.last_ma50(), rsi_rows.last_rsi()) {
        (Some(price), Some(ma20), Some(ma50), Some(rsi14)) => Ok(DailyReading {
            price,
            ma20,
            ma50,
            rsi14,
            estimate: directional::estimate(&rsi_rows),
        }),
        _ => Err(SkipReason::Undefined),
    }
}

/// Looks a bare group ticker up in the batch under its market symbol.
pub(crate) fn series_for<'a>(data: &'a BatchData, ticker: &str, suffix: &str) -> Result<&'a PriceSeries, SkipReason> {
    let symbol = normalize_symbol(ticker, suffix);
    data.get(&symbol).ok_or_else(|| {
        let err = EngineError::RetrievalFailure {
            symbol,
            reason: "no series in batch".to_string(),
        };
        tracing::debug!(error = %err, "Ticker missing from batch");
        SkipReason::from(&err)
    })
}

/// Numeric sort with the ticker as tie-break, so equal keys order the same on
/// every run.
pub(crate) fn sort_by_key<T>(
    rows: &mut [T],
    key: impl Fn(&T) -> f64,
    ticker: impl Fn(&T) -> &str,
    descending: bool,
) {
    rows.sort_by(|a, b| {
        let ord = key(a).total_cmp(&key(b));
        let ord = if descending { ord.reverse() } else { ord };
        match ord {
            Ordering::Equal => ticker(a).cmp(ticker(b)),
            other => other,
        }
    });
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, TimeZone, Utc};
    use shared::models::{Bar, PriceSeries};

    pub fn daily_series(symbol: &str, closes: &[f64], volumes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&c, &v))| Bar {
                timestamp: start + Duration::days(i as i64),
                open: Some(c),
                high: Some(c),
                low: Some(c),
                close: Some(c),
                volume: Some(v),
            })
            .collect();
        PriceSeries::new(symbol, bars)
    }

    /// Steady rise: MA20 above MA50.
    pub fn rising(symbol: &str, len: usize, step: f64) -> PriceSeries {
        let closes: Vec<f64> = (0..len).map(|i| 100.0 + i as f64 * step + (i % 3) as f64 * 0.4).collect();
        daily_series(symbol, &closes, &vec![1000.0; len])
    }

    /// Steady fall: MA20 below MA50, RSI near zero.
    pub fn falling(symbol: &str, len: usize, step: f64) -> PriceSeries {
        let closes: Vec<f64> = (0..len).map(|i| 200.0 - i as f64 * step).collect();
        daily_series(symbol, &closes, &vec![1000.0; len])
    }

    /// Recovering from a long decline: MA20 below MA50, RSI mid-range.
    pub fn recovering(symbol: &str, len: usize) -> PriceSeries {
        let closes: Vec<f64> = (0..len)
            .map(|i| {
                if i + 10 < len {
                    200.0 - i as f64
                } else {
                    200.0 - (len - 10) as f64 + (i % 2) as f64
                }
            })
            .collect();
        daily_series(symbol, &closes, &vec![1000.0; len])
    }
}
