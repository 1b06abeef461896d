use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One raw OHLCV bar as delivered by a data source. Any field may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl Bar {
    pub fn field(&self, field: Field) -> Option<f64> {
        match field {
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::Volume => self.volume,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
}

/// Bars for one ticker, ascending by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.bars.last().map(|b| b.timestamp)
    }
}

/// A bar that survived sanitization. The close is always present; volume is
/// guaranteed present only when the sanitizer was asked to require it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Interval {
    Minute15,
    Minute30,
    Hour1,
    Day1,
    Week1,
    Month1,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Day1 => "1d",
            Interval::Week1 => "1wk",
            Interval::Month1 => "1mo",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "15m" => Ok(Interval::Minute15),
            "30m" => Ok(Interval::Minute30),
            "1h" | "60m" => Ok(Interval::Hour1),
            "1d" => Ok(Interval::Day1),
            "1wk" => Ok(Interval::Week1),
            "1mo" => Ok(Interval::Month1),
            other => Err(anyhow!("Unknown interval '{}'", other)),
        }
    }
}

/// Lookback window such as `3mo` or `5d`, counted in calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    days: u32,
}

impl Period {
    pub fn days(days: u32) -> Self {
        Self { days }
    }

    pub fn as_days(&self) -> u32 {
        self.days
    }

    pub fn as_duration(&self) -> Duration {
        Duration::days(i64::from(self.days))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.days)
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| anyhow!("Period '{}' has no unit", s))?;
        let (count, unit) = s.split_at(split);
        let count: u32 = count
            .parse()
            .map_err(|e| anyhow!("Invalid period count in '{}': {}", s, e))?;
        let per_unit = match unit {
            "d" => 1,
            "wk" => 7,
            "mo" => 30,
            "y" => 365,
            other => return Err(anyhow!("Unknown period unit '{}' in '{}'", other, s)),
        };
        Ok(Period::days(count * per_unit))
    }
}

/// Point-in-time price facts for one ticker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub last_price: Option<f64>,
    pub year_high: Option<f64>,
    pub year_low: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parsing() {
        assert_eq!("3mo".parse::<Period>().unwrap().as_days(), 90);
        assert_eq!("5d".parse::<Period>().unwrap().as_days(), 5);
        assert_eq!("2wk".parse::<Period>().unwrap().as_days(), 14);
        assert_eq!("1y".parse::<Period>().unwrap().as_days(), 365);
        assert!("mo".parse::<Period>().is_err());
        assert!("3".parse::<Period>().is_err());
        assert!("3h".parse::<Period>().is_err());
    }

    #[test]
    fn test_interval_round_trip_names() {
        for s in ["15m", "30m", "1h", "1d", "1wk", "1mo"] {
            assert_eq!(s.parse::<Interval>().unwrap().as_str(), s);
        }
        assert!("2d".parse::<Interval>().is_err());
    }

    #[test]
    fn test_bar_field_access() {
        let bar = Bar {
            timestamp: Utc::now(),
            open: Some(1.0),
            high: None,
            low: Some(0.5),
            close: Some(0.8),
            volume: None,
        };
        assert_eq!(bar.field(Field::Open), Some(1.0));
        assert_eq!(bar.field(Field::High), None);
        assert_eq!(bar.field(Field::Close), Some(0.8));
        assert_eq!(bar.field(Field::Volume), None);
    }
}
