// Price targets, support and resistance bands
use crate::error::EngineError;
use crate::indicators::{RollingMax, MA_LONG_PERIOD, MA_SHORT_PERIOD};
use serde::Serialize;
use shared::models::PriceSnapshot;
use std::fmt;

const SUPPORT_RATIO: f64 = 0.95;
const SHORT_RESISTANCE_FALLBACK: f64 = 1.02;
const MID_RESISTANCE_FALLBACK: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendLabel {
    Uptrend,
    WeakeningRisk,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendLabel::Uptrend => f.write_str("Uptrend"),
            TrendLabel::WeakeningRisk => f.write_str("Weakening risk"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSet {
    pub price: f64,
    pub year_high: f64,
    pub year_low: f64,
    /// Short, medium and long horizon.
    pub targets: [f64; 3],
    pub support: f64,
    pub resistance_short: f64,
    pub resistance_mid: f64,
    pub resistance_long: f64,
    pub trend: TrendLabel,
}

#[derive(Debug, Clone, Copy)]
pub struct TargetCalculator {
    percentages: [f64; 3],
}

impl TargetCalculator {
    pub fn new(percentages: [f64; 3]) -> Self {
        Self { percentages }
    }

    /// Fails with [`EngineError::MissingFundamentals`] unless price, year high
    /// and year low are all present. Short and mid resistance come from the
    /// trailing 20 and 50 bar close maxima when `closes` covers the window,
    /// else from the year high.
    pub fn compute(
        &self,
        symbol: &str,
        snapshot: &PriceSnapshot,
        closes: Option<&[f64]>,
    ) -> Result<TargetSet, EngineError> {
        let (price, year_high, year_low) = match (snapshot.last_price, snapshot.year_high, snapshot.year_low) {
            (Some(p), Some(h), Some(l)) if p.is_finite() && h.is_finite() && l.is_finite() => (p, h, l),
            _ => return Err(EngineError::MissingFundamentals(symbol.to_string())),
        };

        let targets = self.percentages.map(|pct| price * (1.0 + pct / 100.0));
        let support = year_high * SUPPORT_RATIO;

        let closes = closes.unwrap_or(&[]);
        let resistance_short = RollingMax::new(MA_SHORT_PERIOD)
            .last(closes)
            .unwrap_or(year_high * SHORT_RESISTANCE_FALLBACK);
        let resistance_mid = RollingMax::new(MA_LONG_PERIOD)
            .last(closes)
            .unwrap_or(year_high * MID_RESISTANCE_FALLBACK);

        let trend = if price > support {
            TrendLabel::Uptrend
        } else {
            TrendLabel::WeakeningRisk
        };

        Ok(TargetSet {
            price,
            year_high,
            year_low,
            targets,
            support,
            resistance_short,
            resistance_mid,
            resistance_long: year_high,
            trend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(price: f64, high: f64, low: f64) -> PriceSnapshot {
        PriceSnapshot {
            last_price: Some(price),
            year_high: Some(high),
            year_low: Some(low),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_targets_from_percentages() {
        let calc = TargetCalculator::new([8.0, 15.0, 20.0]);
        let set = calc.compute("X.IS", &snapshot(100.0, 120.0, 80.0), None).unwrap();
        assert!(approx(set.targets[0], 108.0));
        assert!(approx(set.targets[1], 115.0));
        assert!(approx(set.targets[2], 120.0));
        assert!(approx(set.support, 114.0));
        assert!(approx(set.resistance_short, 122.4));
        assert!(approx(set.resistance_mid, 126.0));
        assert_eq!(set.resistance_long, 120.0);
        // 100 is below the 114 support
        assert_eq!(set.trend, TrendLabel::WeakeningRisk);
    }

    #[test]
    fn test_resistance_from_history() {
        let closes: Vec<f64> = (0..60).map(|i| if i == 5 { 150.0 } else { 90.0 + (i % 10) as f64 }).collect();
        let calc = TargetCalculator::new([8.0, 15.0, 20.0]);
        let set = calc.compute("X.IS", &snapshot(118.0, 120.0, 80.0), Some(&closes)).unwrap();
        assert_eq!(set.resistance_short, 99.0);
        assert_eq!(set.resistance_mid, 99.0);
        assert_eq!(set.trend, TrendLabel::Uptrend);

        let set = calc.compute("X.IS", &snapshot(118.0, 120.0, 80.0), Some(&closes[..55])).unwrap();
        assert_eq!(set.resistance_mid, 150.0);
    }

    #[test]
    fn test_short_history_falls_back_per_window() {
        let closes = vec![100.0; 30];
        let calc = TargetCalculator::new([8.0, 15.0, 20.0]);
        let set = calc.compute("X.IS", &snapshot(110.0, 100.0, 80.0), Some(&closes)).unwrap();
        assert_eq!(set.resistance_short, 100.0);
        assert!(approx(set.resistance_mid, 105.0));
    }

    #[test]
    fn test_missing_fundamentals() {
        let calc = TargetCalculator::new([8.0, 15.0, 20.0]);
        let mut snap = snapshot(100.0, 120.0, 80.0);
        snap.year_low = None;
        let err = calc.compute("X.IS", &snap, None).unwrap_err();
        assert!(matches!(err, EngineError::MissingFundamentals(ref s) if s == "X.IS"));
        assert!(calc.compute("X.IS", &PriceSnapshot::default(), None).is_err());
    }
}
