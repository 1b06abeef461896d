// Buy-zone ranking: qualifying tickers with targets, lowest RSI first
use super::{daily_reading, series_for, sort_by_key, BatchReport, SkipReason};
use crate::analysis::{DirectionalOutlook, TargetCalculator};
use crate::config::TickerGroup;
use crate::data::BatchData;
use serde::Serialize;
use shared::models::PriceSnapshot;
use shared::utils::normalize_symbol;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyZoneRow {
    pub ticker: String,
    pub group: String,
    pub price: f64,
    pub ma20: f64,
    pub ma50: f64,
    pub rsi14: f64,
    pub targets: [f64; 3],
    pub probability: f64,
    pub outlook: DirectionalOutlook,
}

/// Scans the disjoint members of `groups`. A ticker qualifies when RSI14 is
/// below 30 or MA20 is above MA50. Targets are computed from the snapshot
/// alone, so resistance bands are not part of the row.
pub fn scan_buy_zone(
    groups: &[&TickerGroup],
    data: &BatchData,
    snapshots: &HashMap<String, PriceSnapshot>,
    calculator: &TargetCalculator,
    suffix: &str,
) -> BatchReport<BuyZoneRow> {
    let mut report = BatchReport::default();
    for group in groups {
        for ticker in &group.members {
            let outcome = evaluate(ticker, &group.name, data, snapshots, calculator, suffix);
            report.record(ticker, &group.name, outcome);
        }
    }
    sort_by_key(&mut report.rows, |r| r.rsi14, |r| r.ticker.as_str(), false);
    tracing::info!(
        rows = report.rows.len(),
        skipped = report.skipped.len(),
        "Buy-zone scan complete"
    );
    report
}

fn evaluate(
    ticker: &str,
    group: &str,
    data: &BatchData,
    snapshots: &HashMap<String, PriceSnapshot>,
    calculator: &TargetCalculator,
    suffix: &str,
) -> Result<BuyZoneRow, SkipReason> {
    let series = series_for(data, ticker, suffix)?;
    let reading = daily_reading(series)?;

    let symbol = normalize_symbol(ticker, suffix);
    let snapshot = snapshots.get(&symbol).copied().unwrap_or_default();
    let targets = calculator
        .compute(&symbol, &snapshot, None)
        .map_err(|e| SkipReason::from(&e))?;

    if !reading.in_buy_zone() {
        return Err(SkipReason::NotQualified);
    }

    Ok(BuyZoneRow {
        ticker: ticker.to_string(),
        group: group.to_string(),
        price: reading.price,
        ma20: reading.ma20,
        ma50: reading.ma50,
        rsi14: reading.rsi14,
        targets: targets.targets,
        probability: reading.estimate.probability,
        outlook: DirectionalOutlook::classify_upside(reading.estimate.probability),
    })
}
