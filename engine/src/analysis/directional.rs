// Directional-probability estimator: next-session upside heuristic
use crate::indicators::{Ema, IndicatorCalculator, IndicatorFrame};
use serde::Serialize;
use std::fmt;

/// Bars the estimator looks back over.
pub const DIRECTIONAL_WINDOW: usize = 60;
const EMA_SPAN: usize = 10;
const VOLUME_WINDOW: usize = 5;

const EMA_BONUS: f64 = 10.0;
const RSI_BONUS: f64 = 5.0;
const VOLUME_BONUS: f64 = 5.0;
const OVERSOLD_RSI: f64 = 30.0;

/// Composite probability and each of its contributing terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionalEstimate {
    pub probability: f64,
    pub trend_pct: f64,
    pub ema_bonus: f64,
    pub rsi_bonus: f64,
    pub volume_bonus: f64,
}

impl DirectionalEstimate {
    pub fn neutral() -> Self {
        Self {
            probability: 50.0,
            trend_pct: 50.0,
            ema_bonus: 0.0,
            rsi_bonus: 0.0,
            volume_bonus: 0.0,
        }
    }

    pub fn outlook(&self) -> DirectionalOutlook {
        DirectionalOutlook::classify(self.probability)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DirectionalOutlook {
    HighUpside,
    MildUpside,
    HighDownside,
    Neutral,
}

impl DirectionalOutlook {
    pub fn classify(probability: f64) -> Self {
        if probability > 70.0 {
            DirectionalOutlook::HighUpside
        } else if probability > 55.0 {
            DirectionalOutlook::MildUpside
        } else if probability < 30.0 {
            DirectionalOutlook::HighDownside
        } else {
            DirectionalOutlook::Neutral
        }
    }

    /// Buy-zone tiers: anything not clearly upside falls back to neutral.
    pub fn classify_upside(probability: f64) -> Self {
        match Self::classify(probability) {
            DirectionalOutlook::HighDownside => DirectionalOutlook::Neutral,
            other => other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DirectionalOutlook::HighUpside => "High upside likelihood",
            DirectionalOutlook::MildUpside => "Mild upside expected",
            DirectionalOutlook::HighDownside => "High downside risk",
            DirectionalOutlook::Neutral => "Neutral/uncertain",
        }
    }
}

impl fmt::Display for DirectionalOutlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Estimates from rows with a defined RSI14. Fewer than
/// [`DIRECTIONAL_WINDOW`] such rows yields [`DirectionalEstimate::neutral`].
pub fn estimate(frame: &IndicatorFrame) -> DirectionalEstimate {
    let frame = frame.with_defined_rsi();
    if frame.len() < DIRECTIONAL_WINDOW {
        return DirectionalEstimate::neutral();
    }

    let candles = &frame.candles;
    let window = &candles[candles.len() - DIRECTIONAL_WINDOW..];
    let increases = window.windows(2).filter(|pair| pair[1].close > pair[0].close).count();
    let trend_pct = increases as f64 / DIRECTIONAL_WINDOW as f64 * 100.0;

    let last_close = frame.last_close().unwrap_or_default();
    let ema_bonus = match Ema::new(EMA_SPAN).calculate(candles).last().copied().flatten() {
        Some(ema) if last_close > ema => EMA_BONUS,
        _ => 0.0,
    };

    let rsi_bonus = match frame.last_rsi() {
        Some(rsi) if rsi < OVERSOLD_RSI => RSI_BONUS,
        _ => 0.0,
    };

    let recent_volumes: Vec<f64> = candles[candles.len() - VOLUME_WINDOW..]
        .iter()
        .filter_map(|c| c.volume)
        .collect();
    let last_volume = candles.last().and_then(|c| c.volume);
    let volume_bonus = match (last_volume, recent_volumes.is_empty()) {
        (Some(volume), false) => {
            let avg = recent_volumes.iter().sum::<f64>() / recent_volumes.len() as f64;
            if volume > avg {
                VOLUME_BONUS
            } else {
                0.0
            }
        }
        _ => 0.0,
    };

    DirectionalEstimate {
        probability: trend_pct + ema_bonus + rsi_bonus + volume_bonus,
        trend_pct,
        ema_bonus,
        rsi_bonus,
        volume_bonus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{candles_from_closes, candles_with_volume};

    #[test]
    fn test_flat_quiet_series_scores_zero() {
        // No increases, RSI held at 50, last volume under its 5-bar mean,
        // last close equal to (not above) its EMA.
        let closes = vec![100.0; 80];
        let volumes: Vec<f64> = (0..80).map(|i| 10_000.0 - i as f64 * 10.0).collect();
        let frame = IndicatorFrame::compute(candles_with_volume(&closes, &volumes));

        let est = estimate(&frame);
        assert_eq!(est.probability, 0.0);
        assert_eq!(est.trend_pct, 0.0);
        assert_eq!(est.ema_bonus, 0.0);
        assert_eq!(est.rsi_bonus, 0.0);
        assert_eq!(est.volume_bonus, 0.0);
        assert_eq!(est.outlook(), DirectionalOutlook::HighDownside);
    }

    #[test]
    fn test_step_down_below_ema_scores_zero() {
        // One drop 20 bars back, flat since: no increases, RSI window flat
        // (50), and the 10-EMA still above the new level.
        let closes: Vec<f64> = (0..80).map(|i| if i < 60 { 100.0 } else { 90.0 }).collect();
        let volumes: Vec<f64> = (0..80).map(|i| 10_000.0 - i as f64 * 10.0).collect();
        let frame = IndicatorFrame::compute(candles_with_volume(&closes, &volumes));

        let rows = frame.with_defined_rsi();
        let ema = Ema::new(EMA_SPAN).calculate(&rows.candles).last().copied().flatten().unwrap();
        assert!(90.0 < ema);
        assert!(rows.last_rsi().unwrap() >= 30.0);

        let est = estimate(&frame);
        assert_eq!(est.trend_pct, 0.0);
        assert_eq!(est.ema_bonus, 0.0);
        assert_eq!(est.rsi_bonus, 0.0);
        assert_eq!(est.volume_bonus, 0.0);
        assert_eq!(est.probability, 0.0);
    }

    #[test]
    fn test_short_history_is_neutral() {
        // 70 bars leave 57 rows with a defined RSI
        let closes: Vec<f64> = (0..70).map(|i| 100.0 + i as f64).collect();
        let frame = IndicatorFrame::compute(candles_from_closes(&closes));
        assert_eq!(estimate(&frame), DirectionalEstimate::neutral());
        assert_eq!(estimate(&IndicatorFrame::default()), DirectionalEstimate::neutral());
    }

    #[test]
    fn test_steady_rise_with_volume_spike() {
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let mut volumes = vec![1000.0; 100];
        volumes[99] = 5000.0;
        let frame = IndicatorFrame::compute(candles_with_volume(&closes, &volumes));

        let est = estimate(&frame);
        // 59 increases inside a 60-bar window
        assert!((est.trend_pct - 59.0 / 60.0 * 100.0).abs() < 1e-9);
        assert_eq!(est.ema_bonus, 10.0);
        assert_eq!(est.rsi_bonus, 0.0);
        assert_eq!(est.volume_bonus, 5.0);
        assert!((est.probability - (est.trend_pct + 15.0)).abs() < 1e-9);
        assert_eq!(est.outlook(), DirectionalOutlook::HighUpside);
    }

    #[test]
    fn test_oversold_decline_gets_rsi_bonus() {
        let closes: Vec<f64> = (0..100).map(|i| 200.0 - i as f64).collect();
        let frame = IndicatorFrame::compute(candles_from_closes(&closes));
        let est = estimate(&frame);
        assert_eq!(est.trend_pct, 0.0);
        assert_eq!(est.rsi_bonus, 5.0);
        assert_eq!(est.ema_bonus, 0.0);
        // Constant volume: last equals the mean, no bonus
        assert_eq!(est.volume_bonus, 0.0);
        assert_eq!(est.probability, 5.0);
    }

    #[test]
    fn test_missing_volume_gives_no_bonus() {
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + (i % 2) as f64).collect();
        let mut candles = candles_from_closes(&closes);
        for c in candles.iter_mut() {
            c.volume = None;
        }
        let est = estimate(&IndicatorFrame::compute(candles));
        assert_eq!(est.volume_bonus, 0.0);
    }

    #[test]
    fn test_classification_thresholds() {
        assert_eq!(DirectionalOutlook::classify(70.1), DirectionalOutlook::HighUpside);
        assert_eq!(DirectionalOutlook::classify(70.0), DirectionalOutlook::MildUpside);
        assert_eq!(DirectionalOutlook::classify(55.0), DirectionalOutlook::Neutral);
        assert_eq!(DirectionalOutlook::classify(30.0), DirectionalOutlook::Neutral);
        assert_eq!(DirectionalOutlook::classify(29.9), DirectionalOutlook::HighDownside);
        assert_eq!(DirectionalOutlook::classify_upside(10.0), DirectionalOutlook::Neutral);
        assert_eq!(DirectionalOutlook::classify_upside(56.0), DirectionalOutlook::MildUpside);
    }
}
