use super::{
    last_value, IndicatorCalculator, Rsi, Sma, MA_LONG_PERIOD, MA_SHORT_PERIOD, RSI_PERIOD,
};
use shared::models::Candle;

/// Sanitized candles with MA20, MA50 and RSI14 aligned row for row.
#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    pub candles: Vec<Candle>,
    pub ma20: Vec<Option<f64>>,
    pub ma50: Vec<Option<f64>>,
    pub rsi14: Vec<Option<f64>>,
}

impl IndicatorFrame {
    pub fn compute(candles: Vec<Candle>) -> Self {
        let ma20 = Sma::new(MA_SHORT_PERIOD).calculate(&candles);
        let ma50 = Sma::new(MA_LONG_PERIOD).calculate(&candles);
        let rsi14 = Rsi::new(RSI_PERIOD).calculate(&candles);
        Self {
            candles,
            ma20,
            ma50,
            rsi14,
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }

    pub fn last_ma20(&self) -> Option<f64> {
        last_value(&self.ma20)
    }

    pub fn last_ma50(&self) -> Option<f64> {
        last_value(&self.ma50)
    }

    pub fn last_rsi(&self) -> Option<f64> {
        last_value(&self.rsi14)
    }

    /// Rows where RSI14 is defined. Indicator values are carried over, not recomputed.
    pub fn with_defined_rsi(&self) -> Self {
        self.retain_rows(|i| self.rsi14[i].is_some())
    }

    /// Rows where RSI14, MA20 and MA50 are all defined.
    pub fn with_complete_indicators(&self) -> Self {
        self.retain_rows(|i| self.rsi14[i].is_some() && self.ma20[i].is_some() && self.ma50[i].is_some())
    }

    fn retain_rows(&self, keep: impl Fn(usize) -> bool) -> Self {
        let mut frame = Self::default();
        for i in (0..self.len()).filter(|&i| keep(i)) {
            frame.candles.push(self.candles[i].clone());
            frame.ma20.push(self.ma20[i]);
            frame.ma50.push(self.ma50[i]);
            frame.rsi14.push(self.rsi14[i]);
        }
        frame
    }
}
