// Drops bars with missing required fields before any indicator sees them
use crate::error::EngineError;
use shared::models::{Candle, Field, PriceSeries};

pub const CLOSE_ONLY: &[Field] = &[Field::Close];
pub const CLOSE_AND_VOLUME: &[Field] = &[Field::Close, Field::Volume];

/// Minimum sanitized bars for the daily multi-indicator pipelines.
pub const MIN_DAILY_BARS: usize = 50;

/// Keeps only bars where every `required` field holds a finite value. The close
/// is always required, since a bar without one cannot become a candle.
pub fn sanitize(series: &PriceSeries, required: &[Field]) -> Vec<Candle> {
    series
        .bars
        .iter()
        .filter(|bar| required.iter().all(|&f| bar.field(f).map_or(false, f64::is_finite)))
        .filter_map(|bar| {
            let close = bar.close.filter(|c| c.is_finite())?;
            Some(Candle {
                timestamp: bar.timestamp,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close,
                volume: bar.volume.filter(|v| v.is_finite()),
            })
        })
        .collect()
}

pub fn ensure_min_len(symbol: &str, candles: &[Candle], required: usize) -> Result<(), EngineError> {
    if candles.len() < required {
        return Err(EngineError::InsufficientData {
            symbol: symbol.to_string(),
            required,
            available: candles.len(),
        });
    }
    Ok(())
}

/// Sanitizes requiring close and volume, then enforces the daily minimum.
pub fn sanitize_daily(series: &PriceSeries) -> Result<Vec<Candle>, EngineError> {
    let candles = sanitize(series, CLOSE_AND_VOLUME);
    ensure_min_len(&series.symbol, &candles, MIN_DAILY_BARS)?;
    Ok(candles)
}
