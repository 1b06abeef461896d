// Session movers: a user-supplied watch list ranked by session change
use super::{sort_by_key, BatchReport, SkipReason};
use crate::analysis::session_move;
use crate::data::BatchData;
use serde::Serialize;
use shared::utils::{normalize_symbol, strip_suffix};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoverRow {
    pub ticker: String,
    pub price: f64,
    pub change_pct: f64,
    pub rsi14: Option<f64>,
}

const WATCHLIST: &str = "watchlist";

pub fn rank_movers(tickers: &[String], data: &BatchData, suffix: &str) -> BatchReport<MoverRow> {
    let mut report = BatchReport::default();
    for raw in tickers {
        let symbol = normalize_symbol(raw, suffix);
        let ticker = strip_suffix(&symbol, suffix).to_string();
        let outcome = data
            .get(&symbol)
            .ok_or(SkipReason::RetrievalFailure)
            .and_then(|series| session_move(series).ok_or(SkipReason::InsufficientData))
            .and_then(|m| match m.change_pct {
                Some(change_pct) => Ok(MoverRow {
                    ticker: ticker.clone(),
                    price: m.price,
                    change_pct,
                    rsi14: m.rsi14,
                }),
                None => Err(SkipReason::Undefined),
            });
        report.record(&ticker, WATCHLIST, outcome);
    }
    sort_by_key(&mut report.rows, |r| r.change_pct, |r| r.ticker.as_str(), true);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::test_support::daily_series;

    #[test]
    fn test_rank_movers() {
        let mut data = BatchData::new();
        data.insert("AKBNK.IS".into(), daily_series("AKBNK.IS", &[10.0, 10.5, 11.0], &[1.0; 3]));
        data.insert("THYAO.IS".into(), daily_series("THYAO.IS", &[200.0, 190.0], &[1.0; 2]));
        data.insert("EREGL.IS".into(), daily_series("EREGL.IS", &[40.0, 41.0, 42.0], &[1.0; 3]));
        data.insert("ZERO.IS".into(), daily_series("ZERO.IS", &[0.0, 1.0], &[1.0; 2]));

        let tickers: Vec<String> = ["akbnk", " THYAO ", "EREGL.IS", "ZERO", "MISSING"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let report = rank_movers(&tickers, &data, ".IS");

        let order: Vec<&str> = report.rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(order, vec!["AKBNK", "EREGL", "THYAO"]);
        assert!((report.rows[0].change_pct - 10.0).abs() < 1e-9);
        assert!((report.rows[2].change_pct + 5.0).abs() < 1e-9);
        assert_eq!(report.skipped_for(SkipReason::Undefined), 1);
        assert_eq!(report.skipped_for(SkipReason::RetrievalFailure), 1);
    }
}
