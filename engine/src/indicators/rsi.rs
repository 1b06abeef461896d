// Relative Strength Index (RSI) indicator implementation
use super::IndicatorCalculator;
use shared::models::Candle;

/// RSI over simple rolling means of gains and losses.
///
/// The first bar has no prior close and contributes a zero gain and zero loss,
/// so the first defined value sits at index `period - 1`. With fewer than
/// `period` candles every position is undefined.
///
/// Zero mean loss: 100 when the mean gain is positive, 50 when both are zero.
pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }

    fn from_means(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            if avg_gain > 0.0 {
                100.0
            } else {
                50.0
            }
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - (100.0 / (1.0 + rs))
        }
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> usize {
        self.period
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        if self.period == 0 || data.len() < self.period {
            return vec![None; data.len()];
        }

        let mut gains = Vec::with_capacity(data.len());
        let mut losses = Vec::with_capacity(data.len());
        gains.push(0.0);
        losses.push(0.0);
        for pair in data.windows(2) {
            let change = pair[1].close - pair[0].close;
            if change > 0.0 {
                gains.push(change);
                losses.push(0.0);
            } else {
                gains.push(0.0);
                losses.push(-change); // losses are positive values
            }
        }

        let mut results = vec![None; self.period - 1];
        // Each window is summed directly so an all-zero window gives an exact zero.
        for end in self.period..=data.len() {
            let start = end - self.period;
            let avg_gain = gains[start..end].iter().sum::<f64>() / self.period as f64;
            let avg_loss = losses[start..end].iter().sum::<f64>() / self.period as f64;
            results.push(Some(Self::from_means(avg_gain, avg_loss)));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::candles_from_closes;

    #[test]
    fn test_rsi_warm_up_positions() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + (i % 3) as f64).collect();
        let results = Rsi::new(14).calculate(&candles_from_closes(&closes));
        assert_eq!(results.len(), 20);
        assert!(results[..13].iter().all(Option::is_none));
        assert!(results[13..].iter().all(Option::is_some));
    }

    #[test]
    fn test_rsi_too_short_is_all_undefined() {
        let closes: Vec<f64> = (0..13).map(f64::from).collect();
        let results = Rsi::new(14).calculate(&candles_from_closes(&closes));
        assert_eq!(results, vec![None; 13]);
    }

    #[test]
    fn test_rsi_known_value() {
        // Diffs: +1, -1, +2 (the first slot contributes nothing)
        let candles = candles_from_closes(&[10.0, 11.0, 10.0, 12.0]);
        let results = Rsi::new(4).calculate(&candles);
        // avg gain = 3/4, avg loss = 1/4, rs = 3, rsi = 75
        assert!(results[..3].iter().all(Option::is_none));
        assert!((results[3].unwrap() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_zero_loss_conventions() {
        let rising: Vec<f64> = (0..20).map(f64::from).collect();
        let results = Rsi::new(14).calculate(&candles_from_closes(&rising));
        assert_eq!(results.last().copied().flatten(), Some(100.0));

        let flat = vec![42.0; 20];
        let results = Rsi::new(14).calculate(&candles_from_closes(&flat));
        assert!(results.iter().flatten().all(|&v| v == 50.0));

        let falling: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let results = Rsi::new(14).calculate(&candles_from_closes(&falling));
        assert_eq!(results.last().copied().flatten(), Some(0.0));
    }

    #[test]
    fn test_rsi_bounded() {
        let closes: Vec<f64> = (0..200)
            .map(|i| 50.0 + 10.0 * ((i as f64) * 0.37).sin() + ((i * 7919) % 13) as f64 * 0.3)
            .collect();
        let results = Rsi::new(14).calculate(&candles_from_closes(&closes));
        for value in results.into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value), "RSI out of range: {}", value);
        }
    }
}
