// Ceiling-score estimators: likelihood of a limit-up style session
use crate::data::sanitizer::{sanitize, CLOSE_AND_VOLUME, CLOSE_ONLY, MIN_DAILY_BARS};
use crate::indicators::{
    last_value, IndicatorCalculator, IndicatorFrame, Rsi, Sma, MA_LONG_PERIOD, MA_SHORT_PERIOD,
    RSI_PERIOD,
};
use serde::Serialize;
use shared::models::PriceSeries;
use std::fmt;

pub const HIGH_CEILING_SCORE: u32 = 70;
const VOLUME_AVG_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CeilingScore {
    pub score: u32,
    pub pct_change: Option<f64>,
    pub rsi: Option<f64>,
    pub volume: Option<f64>,
    pub avg_volume: Option<f64>,
}

impl CeilingScore {
    /// Returned when the series cannot support a score. Never ranked.
    pub fn sentinel() -> Self {
        Self {
            score: 0,
            pct_change: None,
            rsi: None,
            volume: None,
            avg_volume: None,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.pct_change.is_some() && self.rsi.is_some()
    }

    pub fn outlook(&self) -> CeilingOutlook {
        if self.score >= HIGH_CEILING_SCORE {
            CeilingOutlook::High
        } else {
            CeilingOutlook::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CeilingOutlook {
    High,
    Normal,
}

impl fmt::Display for CeilingOutlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CeilingOutlook::High => f.write_str("High ceiling likelihood"),
            CeilingOutlook::Normal => f.write_str("Normal"),
        }
    }
}

/// Percentage change, undefined when the base is zero.
pub fn pct_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        None
    } else {
        Some((to - from) / from * 100.0)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Daily ceiling score (0 to 100) from close and volume.
///
/// Every input is read on the rows where RSI14 is defined, moving averages
/// included, so MA50 needs 50 bars past the RSI warm-up.
pub fn ceiling_score(series: &PriceSeries) -> CeilingScore {
    let candles = sanitize(series, CLOSE_AND_VOLUME);
    if candles.len() < MIN_DAILY_BARS {
        tracing::debug!(symbol = %series.symbol, bars = candles.len(), "Too few bars for ceiling score");
        return CeilingScore::sentinel();
    }

    let frame = IndicatorFrame::compute(candles);
    let rows = frame.with_defined_rsi();
    if rows.len() < 2 {
        return CeilingScore::sentinel();
    }

    let n = rows.len();
    let close = rows.candles[n - 1].close;
    let prev_close = rows.candles[n - 2].close;
    let Some(change) = pct_change(prev_close, close) else {
        tracing::debug!(symbol = %series.symbol, "Previous close is zero, no ceiling score");
        return CeilingScore::sentinel();
    };
    let rsi = rows.last_rsi();
    let volumes: Vec<f64> = rows.candles.iter().filter_map(|c| c.volume).collect();
    let volume = volumes.last().copied();
    let avg_volume = mean(&volumes[volumes.len().saturating_sub(VOLUME_AVG_WINDOW)..]);

    let mut score = 0;
    if change > 7.0 {
        score += 30;
    }
    if let (Some(v), Some(avg)) = (volume, avg_volume) {
        if v > avg * 1.5 {
            score += 25;
        }
    }
    if rsi.map_or(false, |r| r > 50.0) {
        score += 15;
    }
    let ma20 = last_value(&Sma::new(MA_SHORT_PERIOD).calculate(&rows.candles));
    let ma50 = last_value(&Sma::new(MA_LONG_PERIOD).calculate(&rows.candles));
    if ma20.map_or(false, |ma| close > ma) {
        score += 15;
    }
    if ma50.map_or(false, |ma| close > ma) {
        score += 15;
    }

    CeilingScore {
        score,
        pct_change: Some(change),
        rsi,
        volume,
        avg_volume,
    }
}

/// Short-horizon ceiling probability from an intraday series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntradayCeiling {
    pub symbol: String,
    pub price: f64,
    pub change_pct: Option<f64>,
    pub volume_ratio: f64,
    pub rsi: Option<f64>,
    pub above_ma20: bool,
    pub points: u32,
    pub probability: u32,
}

const INTRADAY_MAX_PROBABILITY: u32 = 95;
const INTRADAY_POINT_WEIGHT: u32 = 20;

/// `None` when no bar carries a close.
pub fn intraday_ceiling(series: &PriceSeries) -> Option<IntradayCeiling> {
    let candles = sanitize(series, CLOSE_ONLY);
    let first = candles.first()?.close;
    let last = candles.last()?;
    let price = last.close;
    let change_pct = pct_change(first, price);

    let volumes: Vec<f64> = candles.iter().filter_map(|c| c.volume).collect();
    let volume_ratio = match (last.volume, mean(&volumes)) {
        (Some(v), Some(avg)) if avg > 0.0 => v / avg,
        _ => 1.0,
    };

    let rsi = last_value(&Rsi::new(RSI_PERIOD).calculate(&candles));
    let above_ma20 = last_value(&Sma::new(MA_SHORT_PERIOD).calculate(&candles)).map_or(false, |ma| price > ma);

    let mut points = 0;
    if change_pct.map_or(false, |c| c > 6.0) {
        points += 2;
    }
    if volume_ratio > 1.5 {
        points += 2;
    }
    if rsi.map_or(false, |r| r > 65.0) {
        points += 1;
    }
    if above_ma20 {
        points += 1;
    }

    Some(IntradayCeiling {
        symbol: series.symbol.clone(),
        price,
        change_pct,
        volume_ratio,
        rsi,
        above_ma20,
        points,
        probability: (points * INTRADAY_POINT_WEIGHT).min(INTRADAY_MAX_PROBABILITY),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use shared::models::Bar;

    fn series(closes: &[f64], volumes: &[f64]) -> PriceSeries {
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
        PriceSeries::new("TEST.IS", bars)
    }

    /// Gently rising closes with a final 8% jump on doubled volume.
    fn breakout() -> PriceSeries {
        let mut closes: Vec<f64> = (0..79).map(|i| 100.0 + (i % 3) as f64 * 0.5 + i as f64 * 0.1).collect();
        let prev = *closes.last().unwrap();
        closes.push(prev * 1.08);
        let mut volumes = vec![1_000_000.0; 80];
        volumes[79] = 2_250_000.0; // twice the 10-bar mean that includes it
        series(&closes, &volumes)
    }

    #[test]
    fn test_full_score() {
        let result = ceiling_score(&breakout());
        assert!((result.pct_change.unwrap() - 8.0).abs() < 1e-9);
        assert!((result.avg_volume.unwrap() - 1_125_000.0).abs() < 1e-6);
        assert!(result.rsi.unwrap() > 50.0);
        assert_eq!(result.score, 100);
        assert_eq!(result.outlook(), CeilingOutlook::High);
    }

    #[test]
    fn test_quiet_dip_scores_zero() {
        // Flat, then a small dip on ordinary volume: no condition fires
        let mut closes = vec![100.0; 79];
        closes.push(99.0);
        let result = ceiling_score(&series(&closes, &vec![1000.0; 80]));
        assert_eq!(result.score, 0);
        assert!(result.is_defined());
        assert!((result.pct_change.unwrap() + 1.0).abs() < 1e-9);
        assert_eq!(result.outlook(), CeilingOutlook::Normal);
    }

    #[test]
    fn test_short_series_is_sentinel() {
        let closes: Vec<f64> = (0..49).map(|i| 100.0 + i as f64).collect();
        let result = ceiling_score(&series(&closes, &vec![1000.0; 49]));
        assert_eq!(result, CeilingScore::sentinel());
        assert!(!result.is_defined());
    }

    #[test]
    fn test_missing_volume_rows_are_dropped_first() {
        let mut s = breakout();
        for bar in s.bars.iter_mut().take(40) {
            bar.volume = None;
        }
        // 40 usable bars remain
        assert_eq!(ceiling_score(&s), CeilingScore::sentinel());
    }

    #[test]
    fn test_zero_previous_close_is_sentinel() {
        let mut closes = vec![100.0; 79];
        closes[78] = 0.0;
        closes.push(5.0);
        let result = ceiling_score(&series(&closes, &vec![1000.0; 80]));
        assert_eq!(result, CeilingScore::sentinel());
    }

    #[test]
    fn test_ma50_needs_bars_past_rsi_warmup() {
        // 55 bars leave 42 RSI rows: MA20 defined, MA50 not
        let closes: Vec<f64> = (0..55).map(|i| 100.0 + i as f64).collect();
        let result = ceiling_score(&series(&closes, &vec![1000.0; 55]));
        assert_eq!(result.rsi, Some(100.0));
        assert_eq!(result.score, 30);
    }

    #[test]
    fn test_pct_change() {
        assert_eq!(pct_change(0.0, 10.0), None);
        assert_eq!(pct_change(50.0, 55.0), Some(10.0));
    }

    #[test]
    fn test_intraday_strong_session() {
        let mut closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 0.25).collect();
        closes.push(112.0);
        let mut volumes = vec![1000.0; 41];
        volumes[40] = 10_000.0;
        let result = intraday_ceiling(&series(&closes, &volumes)).unwrap();
        assert!((result.change_pct.unwrap() - 12.0).abs() < 1e-9);
        assert!(result.volume_ratio > 1.5);
        assert!(result.above_ma20);
        assert_eq!(result.points, 6);
        assert_eq!(result.probability, 95);
    }

    #[test]
    fn test_intraday_quiet_session() {
        let result = intraday_ceiling(&series(&[10.0, 10.0, 10.0], &[0.0, 0.0, 0.0])).unwrap();
        assert_eq!(result.volume_ratio, 1.0);
        assert_eq!(result.rsi, None);
        assert!(!result.above_ma20);
        assert_eq!(result.points, 0);
        assert_eq!(result.probability, 0);
        assert!(intraday_ceiling(&PriceSeries::new("EMPTY.IS", vec![])).is_none());
    }
}
