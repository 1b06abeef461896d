// Single-ticker analysis: targets, trend and next-session outlook
use super::directional::{self, DirectionalEstimate, DirectionalOutlook};
use super::targets::{TargetCalculator, TargetSet, TrendLabel};
use crate::data::sanitizer::sanitize_daily;
use crate::error::EngineError;
use crate::indicators::IndicatorFrame;
use serde::Serialize;
use shared::models::{PriceSeries, PriceSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerAnalysis {
    pub symbol: String,
    pub price: f64,
    pub trend: TrendLabel,
    pub outlook: DirectionalOutlook,
    pub estimate: DirectionalEstimate,
    pub rsi14: f64,
    pub ma20: f64,
    pub ma50: f64,
    pub targets: TargetSet,
}

/// Full analysis of one ticker. Resistance bands use the ticker's own closes.
/// Indicator readings and the directional estimate use only rows where RSI14,
/// MA20 and MA50 are all defined.
pub fn analyze(
    series: &PriceSeries,
    snapshot: &PriceSnapshot,
    calculator: &TargetCalculator,
) -> Result<TickerAnalysis, EngineError> {
    let candles = sanitize_daily(series)?;
    let frame = IndicatorFrame::compute(candles);
    let targets = calculator.compute(&series.symbol, snapshot, Some(&frame.closes()))?;

    let complete = frame.with_complete_indicators();
    let (Some(rsi14), Some(ma20), Some(ma50)) = (complete.last_rsi(), complete.last_ma20(), complete.last_ma50()) else {
        return Err(EngineError::InsufficientData {
            symbol: series.symbol.clone(),
            required: crate::indicators::MA_LONG_PERIOD,
            available: frame.len(),
        });
    };

    let estimate = directional::estimate(&complete);
    tracing::debug!(
        symbol = %series.symbol,
        probability = estimate.probability,
        rows = complete.len(),
        "Directional estimate computed"
    );

    Ok(TickerAnalysis {
        symbol: series.symbol.clone(),
        price: targets.price,
        trend: targets.trend,
        outlook: estimate.outlook(),
        estimate,
        rsi14,
        ma20,
        ma50,
        targets,
    })
}
