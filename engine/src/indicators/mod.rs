// Technical indicators module
pub mod ema;
pub mod frame;
pub mod rolling_max;
pub mod rsi;
pub mod sma;

pub use ema::Ema;
pub use frame::IndicatorFrame;
pub use rolling_max::RollingMax;
pub use rsi::Rsi;
pub use sma::Sma;

use shared::models::Candle;

pub const MA_SHORT_PERIOD: usize = 20;
pub const MA_LONG_PERIOD: usize = 50;
pub const RSI_PERIOD: usize = 14;

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn period(&self) -> usize;
    /// One value per candle, `None` where the indicator is undefined
    /// (warm-up or insufficient data).
    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>>;
}

/// Last defined value of an indicator column, if the last row is defined.
pub fn last_value(values: &[Option<f64>]) -> Option<f64> {
    values.last().copied().flatten()
}
