// Exponential Moving Average (EMA) indicator implementation
use super::IndicatorCalculator;
use shared::models::Candle;

/// Recursive EMA seeded with the first close, smoothing factor `2 / (span + 1)`,
/// no bias adjustment. Defined from the first bar on.
pub struct Ema {
    name: String,
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self {
            name: format!("EMA({})", span),
            span,
        }
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> usize {
        self.span
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        if data.is_empty() || self.span == 0 {
            return vec![None; data.len()];
        }

        let alpha = self.alpha();
        let mut results = Vec::with_capacity(data.len());
        let mut previous_ema = data[0].close;
        results.push(Some(previous_ema));

        for candle in data.iter().skip(1) {
            let ema = alpha * candle.close + (1.0 - alpha) * previous_ema;
            results.push(Some(ema));
            previous_ema = ema;
        }
        results
    }
}
