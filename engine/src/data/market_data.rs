// Manages market data loaded from price files: bars per symbol and interval, plus snapshots
use super::csv_parser::OhlcvCsvParser;
use super::source::{BatchData, MarketDataSource};
use crate::config::CsvSettings;
use crate::error::EngineError;
use chrono::{DateTime, Duration, Utc};
use shared::models::{Bar, Interval, Period, PriceSeries, PriceSnapshot};
use shared::utils::normalize_symbol;
use std::collections::HashMap;
use std::path::Path;

pub const SNAPSHOT_FILE: &str = "snapshots.csv";
const YEAR_DAYS: i64 = 365;

#[derive(Debug, Default)]
pub struct MarketDataStore {
    data: HashMap<String, HashMap<Interval, Vec<Bar>>>,
    snapshots: HashMap<String, PriceSnapshot>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        MarketDataStore {
            data: HashMap::new(),
            snapshots: HashMap::new(),
        }
    }

    /// Merges bars into the store. Bars are kept sorted and one per timestamp;
    /// on a timestamp clash the bar already stored wins.
    pub fn add_bars(&mut self, symbol: &str, interval: Interval, new_bars: Vec<Bar>) -> usize {
        let symbol_data = self.data.entry(symbol.to_string()).or_default();
        let bars = symbol_data.entry(interval).or_default();
        let before = bars.len();
        bars.extend(new_bars);
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        bars.len() - before
    }

    pub fn get_bars(
        &self,
        symbol: &str,
        interval: Interval,
        from_timestamp: Option<DateTime<Utc>>,
        to_timestamp: Option<DateTime<Utc>>,
    ) -> Option<Vec<Bar>> {
        self.data
            .get(symbol)
            .and_then(|symbol_data| symbol_data.get(&interval))
            .map(|bars| {
                bars.iter()
                    .filter(|b| from_timestamp.map_or(true, |start| b.timestamp >= start))
                    .filter(|b| to_timestamp.map_or(true, |end| b.timestamp <= end))
                    .cloned()
                    .collect()
            })
    }

    pub fn set_snapshot(&mut self, symbol: &str, snapshot: PriceSnapshot) {
        self.snapshots.insert(symbol.to_string(), snapshot);
    }

    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.data.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    /// Loads every `*.csv` in `dir` as `interval` bars, the file stem being the
    /// ticker code. A `snapshots.csv` file, if present, registers snapshots.
    /// Returns the number of price files loaded.
    pub fn load_directory(
        &mut self,
        dir: &Path,
        interval: Interval,
        suffix: &str,
        settings: CsvSettings,
    ) -> Result<usize, EngineError> {
        let mut loaded = 0;
        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("csv")))
            .collect();
        entries.sort();

        for path in entries {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!(path = %path.display(), "Skipping file with non UTF-8 name");
                continue;
            };
            if path.file_name().map_or(false, |n| n == SNAPSHOT_FILE) {
                for (symbol, snapshot) in OhlcvCsvParser::load_snapshots(&path, settings)? {
                    self.set_snapshot(&normalize_symbol(&symbol, suffix), snapshot);
                }
                continue;
            }
            let symbol = normalize_symbol(stem, suffix);
            let series = OhlcvCsvParser::load_series(&path, &symbol, settings)?;
            self.add_bars(&symbol, interval, series.bars);
            loaded += 1;
        }

        tracing::info!(dir = %dir.display(), files = loaded, %interval, "Loaded price directory");
        Ok(loaded)
    }

    fn derive_snapshot(&self, symbol: &str) -> Option<PriceSnapshot> {
        let bars = self.data.get(symbol)?.get(&Interval::Day1)?;
        let last = bars.iter().rev().find(|b| b.close.is_some())?;
        let window_start = last.timestamp - Duration::days(YEAR_DAYS);
        let year: Vec<&Bar> = bars
            .iter()
            .filter(|b| b.timestamp > window_start && b.timestamp <= last.timestamp)
            .collect();

        let year_high = year
            .iter()
            .filter_map(|b| b.high.or(b.close))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));
        let year_low = year
            .iter()
            .filter_map(|b| b.low.or(b.close))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))));

        Some(PriceSnapshot {
            last_price: last.close,
            year_high,
            year_low,
        })
    }
}

impl MarketDataSource for MarketDataStore {
    fn fetch_series(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        interval: Interval,
    ) -> Result<PriceSeries, EngineError> {
        self.get_bars(symbol, interval, start, end)
            .map(|bars| PriceSeries::new(symbol, bars))
            .ok_or_else(|| {
                EngineError::MarketDataError(format!(
                    "Market data not found for symbol '{}' and interval {}",
                    symbol, interval
                ))
            })
    }

    /// The window ends at each symbol's own latest bar; the store holds a
    /// snapshot of history, not a live feed.
    fn fetch_batch(&self, symbols: &[String], period: Period, interval: Interval) -> BatchData {
        let mut batch = BatchData::new();
        for symbol in symbols {
            let Some(bars) = self.data.get(symbol).and_then(|d| d.get(&interval)) else {
                continue;
            };
            let Some(last) = bars.last() else {
                continue;
            };
            let start = last.timestamp - period.as_duration();
            let window: Vec<Bar> = bars.iter().filter(|b| b.timestamp > start).cloned().collect();
            batch.insert(symbol.clone(), PriceSeries::new(symbol.as_str(), window));
        }
        batch
    }

    fn fetch_snapshot(&self, symbol: &str) -> Result<PriceSnapshot, EngineError> {
        if let Some(snapshot) = self.snapshots.get(symbol) {
            return Ok(*snapshot);
        }
        self.derive_snapshot(symbol).ok_or_else(|| {
            EngineError::MarketDataError(format!("Snapshot not found for symbol '{}'", symbol))
        })
    }
}
