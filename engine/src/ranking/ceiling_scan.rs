// Ceiling ranking over a single group, highest score first
use super::{series_for, sort_by_key, BatchReport, SkipReason};
use crate::analysis::{ceiling_score, CeilingOutlook};
use crate::config::TickerGroup;
use crate::data::BatchData;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CeilingRow {
    pub ticker: String,
    pub group: String,
    pub pct_change: f64,
    pub rsi14: f64,
    pub volume: f64,
    pub avg_volume: f64,
    pub score: u32,
    pub outlook: CeilingOutlook,
}

/// Scans the group's declared membership. Tickers whose change or RSI came
/// back undefined are skipped.
pub fn scan_ceiling(group: &TickerGroup, data: &BatchData, suffix: &str) -> BatchReport<CeilingRow> {
    let mut report = BatchReport::default();
    for ticker in &group.declared {
        let outcome = series_for(data, ticker, suffix).and_then(|series| {
            let score = ceiling_score(series);
            match (score.pct_change, score.rsi, score.volume, score.avg_volume) {
                (Some(pct_change), Some(rsi14), Some(volume), Some(avg_volume)) => Ok(CeilingRow {
                    ticker: ticker.clone(),
                    group: group.name.clone(),
                    pct_change,
                    rsi14,
                    volume,
                    avg_volume,
                    score: score.score,
                    outlook: score.outlook(),
                }),
                _ => Err(SkipReason::Undefined),
            }
        });
        report.record(ticker, &group.name, outcome);
    }
    sort_by_key(&mut report.rows, |r| f64::from(r.score), |r| r.ticker.as_str(), true);
    tracing::info!(
        group = %group.name,
        rows = report.rows.len(),
        skipped = report.skipped.len(),
        "Ceiling scan complete"
    );
    report
}
