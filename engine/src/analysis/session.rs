// Session move: price and change over a short intraday window
use super::ceiling::pct_change;
use crate::data::sanitizer::{sanitize, CLOSE_ONLY};
use crate::indicators::{last_value, IndicatorCalculator, Rsi, RSI_PERIOD};
use serde::Serialize;
use shared::models::PriceSeries;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionMove {
    pub symbol: String,
    pub price: f64,
    /// First to last close of the window.
    pub change_pct: Option<f64>,
    pub rsi14: Option<f64>,
}

pub fn session_move(series: &PriceSeries) -> Option<SessionMove> {
    let candles = sanitize(series, CLOSE_ONLY);
    let first = candles.first()?.close;
    let price = candles.last()?.close;
    Some(SessionMove {
        symbol: series.symbol.clone(),
        price,
        change_pct: pct_change(first, price),
        rsi14: last_value(&Rsi::new(RSI_PERIOD).calculate(&candles)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use shared::models::Bar;

    fn series(closes: &[Option<f64>]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + Duration::hours(i as i64),
                open: None,
                high: None,
                low: None,
                close,
                volume: None,
            })
            .collect();
        PriceSeries::new("AKBNK.IS", bars)
    }

    #[test]
    fn test_session_move() {
        let m = session_move(&series(&[None, Some(40.0), Some(41.0), Some(42.0), None])).unwrap();
        assert_eq!(m.price, 42.0);
        assert!((m.change_pct.unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(m.rsi14, None);
    }

    #[test]
    fn test_session_move_with_rsi() {
        let closes: Vec<Option<f64>> = (0..20).map(|i| Some(10.0 + i as f64)).collect();
        let m = session_move(&series(&closes)).unwrap();
        assert_eq!(m.rsi14, Some(100.0));
    }

    #[test]
    fn test_no_closes() {
        assert!(session_move(&series(&[None, None])).is_none());
        let m = session_move(&series(&[Some(0.0), Some(1.0)])).unwrap();
        assert_eq!(m.change_pct, None);
    }
}
