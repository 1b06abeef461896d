use crate::config::CsvSettings;
use crate::error::EngineError;
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::{Bar, PriceSeries, PriceSnapshot};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// Locale-aware number and date/time handling for exported price files
pub mod number_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
    use serde::Deserialize;
    use std::str::FromStr;

    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];
    const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d.%m.%Y %H:%M:%S",
        "%d.%m.%Y %H:%M",
    ];

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum DecimalStyle {
        /// `1,234.56`
        Dot,
        /// `1.234,56`
        Comma,
    }

    /// Cells exporters use for "no value".
    pub fn is_missing(s: &str) -> bool {
        matches!(
            s.trim().to_lowercase().as_str(),
            "" | "nan" | "null" | "none" | "-" | "n/a"
        )
    }

    /// Parses a decimal in the given style. Missing cells are `Ok(None)`.
    pub fn parse_decimal(s: &str, style: DecimalStyle) -> Result<Option<f64>> {
        if is_missing(s) {
            return Ok(None);
        }
        let normalized = match style {
            DecimalStyle::Dot => s.trim().replace(',', ""),
            DecimalStyle::Comma => s.trim().replace('.', "").replace(',', "."),
        };
        let value = f64::from_str(&normalized)
            .map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))?;
        Ok(value.is_finite().then_some(value))
    }

    fn parse_date(date_str: &str) -> Result<NaiveDate> {
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date_str, fmt).ok())
            .ok_or_else(|| anyhow!("Failed to parse date '{}'", date_str))
    }

    fn parse_time(time_str: &str) -> Result<NaiveTime> {
        TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(time_str, fmt).ok())
            .ok_or_else(|| anyhow!("Failed to parse time '{}'", time_str))
    }

    /// Parses a timestamp from a date column and an optional time column,
    /// assumed to be UTC. Without a time column the date cell may carry the
    /// time itself or be RFC 3339.
    pub fn parse_datetime(date_str: &str, time_str: Option<&str>) -> Result<DateTime<Utc>> {
        let date_str = date_str.trim();
        if let Some(time_str) = time_str.filter(|t| !t.trim().is_empty()) {
            let date = parse_date(date_str)?;
            let time = parse_time(time_str.trim())?;
            return Ok(DateTime::from_naive_utc_and_offset(date.and_time(time), Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Some(naive) = DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(date_str, fmt).ok())
        {
            return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
        let date = parse_date(date_str)?;
        Ok(DateTime::from_naive_utc_and_offset(date.and_time(NaiveTime::default()), Utc))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{Datelike, Timelike};

        #[test]
        fn test_parse_decimal_styles() {
            assert_eq!(parse_decimal("1,234.56", DecimalStyle::Dot).unwrap(), Some(1234.56));
            assert_eq!(parse_decimal("1.234,56", DecimalStyle::Comma).unwrap(), Some(1234.56));
            assert_eq!(parse_decimal("123,45", DecimalStyle::Comma).unwrap(), Some(123.45));
            assert_eq!(parse_decimal("600.822.115,84", DecimalStyle::Comma).unwrap(), Some(600822115.84));
        }

        #[test]
        fn test_parse_decimal_missing_cells() {
            for cell in ["", "  ", "NaN", "nan", "null", "-"] {
                assert_eq!(parse_decimal(cell, DecimalStyle::Dot).unwrap(), None, "cell {:?}", cell);
            }
            assert_eq!(parse_decimal("inf", DecimalStyle::Dot).unwrap(), None);
            assert!(parse_decimal("12a", DecimalStyle::Dot).is_err());
        }

        #[test]
        fn test_parse_datetime_variants() {
            let dt = parse_datetime("2024-03-01", None).unwrap();
            assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2024, 3, 1, 0));

            let dt = parse_datetime("01.03.2024", Some("10:30")).unwrap();
            assert_eq!((dt.day(), dt.hour(), dt.minute()), (1, 10, 30));

            let dt = parse_datetime("30/12/2024", Some("18:20:00")).unwrap();
            assert_eq!((dt.month(), dt.day(), dt.hour(), dt.minute()), (12, 30, 18, 20));

            let dt = parse_datetime("2024-03-01 15:45:00", None).unwrap();
            assert_eq!((dt.hour(), dt.minute()), (15, 45));

            let dt = parse_datetime("2024-03-01T09:30:00+03:00", None).unwrap();
            assert_eq!(dt.hour(), 6);
        }

        #[test]
        fn test_parse_datetime_invalid() {
            assert!(parse_datetime("32/12/2024", Some("18:20:00")).is_err());
            assert!(parse_datetime("30/12/2024", Some("25:20:00")).is_err());
            assert!(parse_datetime("yesterday", None).is_err());
        }
    }
}

/// Loads OHLCV price files: a `Date` column, an optional `Time` column, and
/// any of `Open`, `High`, `Low`, `Close`, `Volume`.
pub struct OhlcvCsvParser;

impl OhlcvCsvParser {
    pub fn load_series(path: &Path, symbol: &str, settings: CsvSettings) -> Result<PriceSeries, EngineError> {
        let file = File::open(path)?;
        let mut rdr = Self::reader(settings, BufReader::new(file))?;
        let headers = rdr.headers()?.clone();

        let date_idx = Self::column(&headers, &["Date", "Datetime", "Timestamp"]).ok_or_else(|| {
            EngineError::CsvDataFormatError(format!("Missing 'Date' column in {}", path.display()))
        })?;
        let close_idx = Self::column(&headers, &["Close"]).ok_or_else(|| {
            EngineError::CsvDataFormatError(format!("Missing 'Close' column in {}", path.display()))
        })?;
        let time_idx = Self::column(&headers, &["Time"]);
        let open_idx = Self::column(&headers, &["Open"]);
        let high_idx = Self::column(&headers, &["High"]);
        let low_idx = Self::column(&headers, &["Low"]);
        let volume_idx = Self::column(&headers, &["Volume"]);

        let mut bars = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result?;

            let date_str = record.get(date_idx).unwrap_or_default();
            let time_str = time_idx.and_then(|i| record.get(i));
            let timestamp = number_format::parse_datetime(date_str, time_str).map_err(|e| {
                EngineError::CsvDataFormatError(format!("Error parsing 'Date' at line {}: {}", line, e))
            })?;

            let number = |column: Option<usize>, name: &str| -> Result<Option<f64>, EngineError> {
                match column.and_then(|i| record.get(i)) {
                    Some(cell) => number_format::parse_decimal(cell, settings.decimal).map_err(|e| {
                        EngineError::CsvDataFormatError(format!("Error parsing '{}' at line {}: {}", name, line, e))
                    }),
                    None => Ok(None),
                }
            };

            bars.push(Bar {
                timestamp,
                open: number(open_idx, "Open")?,
                high: number(high_idx, "High")?,
                low: number(low_idx, "Low")?,
                close: number(Some(close_idx), "Close")?,
                volume: number(volume_idx, "Volume")?,
            });
        }

        tracing::debug!(symbol = %symbol, path = %path.display(), bars = bars.len(), "Parsed price file");
        Ok(PriceSeries::new(symbol, bars))
    }

    /// Reads `Symbol,LastPrice,YearHigh,YearLow` rows; empty cells stay missing.
    pub fn load_snapshots(path: &Path, settings: CsvSettings) -> Result<Vec<(String, PriceSnapshot)>, EngineError> {
        let file = File::open(path)?;
        let mut rdr = Self::reader(settings, BufReader::new(file))?;
        let headers = rdr.headers()?.clone();

        let required = |names: &[&str]| {
            Self::column(&headers, names).ok_or_else(|| {
                EngineError::CsvDataFormatError(format!("Missing '{}' column in {}", names[0], path.display()))
            })
        };
        let symbol_idx = required(&["Symbol", "Ticker"])?;
        let price_idx = required(&["LastPrice"])?;
        let high_idx = required(&["YearHigh"])?;
        let low_idx = required(&["YearLow"])?;

        let mut snapshots = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result?;
            let symbol = record.get(symbol_idx).unwrap_or_default().trim().to_string();
            if symbol.is_empty() {
                return Err(EngineError::CsvDataFormatError(format!("Missing 'Symbol' at line {}", line)));
            }
            let number = |column: usize, name: &str| {
                number_format::parse_decimal(record.get(column).unwrap_or_default(), settings.decimal).map_err(|e| {
                    EngineError::CsvDataFormatError(format!("Error parsing '{}' at line {}: {}", name, line, e))
                })
            };
            snapshots.push((
                symbol,
                PriceSnapshot {
                    last_price: number(price_idx, "LastPrice")?,
                    year_high: number(high_idx, "YearHigh")?,
                    year_low: number(low_idx, "YearLow")?,
                },
            ));
        }
        Ok(snapshots)
    }

    fn reader<R: std::io::Read>(settings: CsvSettings, source: R) -> Result<csv::Reader<R>, EngineError> {
        if !settings.delimiter.is_ascii() {
            return Err(EngineError::ConfigError(format!(
                "CSV delimiter '{}' must be a single ASCII character",
                settings.delimiter
            )));
        }
        Ok(ReaderBuilder::new()
            .delimiter(settings.delimiter as u8)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(source))
    }

    // Header lookup by name, case-insensitive, first alias that matches wins.
    fn column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
        names
            .iter()
            .find_map(|name| headers.iter().position(|h| h.eq_ignore_ascii_case(name)))
    }
}
