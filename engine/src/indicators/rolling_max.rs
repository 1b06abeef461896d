// Rolling maximum of close, used for resistance bands
use super::IndicatorCalculator;
use shared::models::Candle;

pub struct RollingMax {
    name: String,
    period: usize,
}

impl RollingMax {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("MAX({})", period),
            period,
        }
    }

    /// Max over the trailing window ending at the last close, if the window is full.
    pub fn last(&self, closes: &[f64]) -> Option<f64> {
        if self.period == 0 || closes.len() < self.period {
            return None;
        }
        closes[closes.len() - self.period..]
            .iter()
            .copied()
            .fold(None, |acc: Option<f64>, c| Some(acc.map_or(c, |m| m.max(c))))
    }
}

impl IndicatorCalculator for RollingMax {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> usize {
        self.period
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = data.iter().map(|c| c.close).collect();
        (0..closes.len())
            .map(|i| self.last(&closes[..=i]))
            .collect()
    }
}
