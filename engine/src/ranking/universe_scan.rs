// Unfiltered universe scan, highest directional probability first
use super::{daily_reading, series_for, sort_by_key, BatchReport, SkipReason};
use crate::config::TickerGroup;
use crate::data::BatchData;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ZoneStatus {
    BuyZone,
    Normal,
}

impl fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneStatus::BuyZone => f.write_str("Buy zone"),
            ZoneStatus::Normal => f.write_str("Normal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniverseRow {
    pub ticker: String,
    pub group: String,
    pub price: f64,
    pub ma20: f64,
    pub ma50: f64,
    pub rsi14: f64,
    pub probability: f64,
    pub status: ZoneStatus,
}

pub fn scan_universe(groups: &[&TickerGroup], data: &BatchData, suffix: &str) -> BatchReport<UniverseRow> {
    let mut report = BatchReport::default();
    for group in groups {
        for ticker in &group.members {
            let outcome = series_for(data, ticker, suffix)
                .and_then(daily_reading)
                .map(|reading| UniverseRow {
                    ticker: ticker.clone(),
                    group: group.name.clone(),
                    price: reading.price,
                    ma20: reading.ma20,
                    ma50: reading.ma50,
                    rsi14: reading.rsi14,
                    probability: reading.estimate.probability,
                    status: if reading.in_buy_zone() {
                        ZoneStatus::BuyZone
                    } else {
                        ZoneStatus::Normal
                    },
                });
            report.record(ticker, &group.name, outcome);
        }
    }
    sort_by_key(&mut report.rows, |r| r.probability, |r| r.ticker.as_str(), true);
    tracing::info!(
        rows = report.rows.len(),
        skipped = report.skipped.len(),
        "Universe scan complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GroupDefinition, Universe};
    use crate::ranking::test_support::{falling, recovering, rising};

    #[test]
    fn test_scan_universe_emits_every_ticker() {
        let universe = Universe::new(vec![
            GroupDefinition {
                name: "A".into(),
                tickers: vec!["UP".into(), "DOWN".into()],
            },
            GroupDefinition {
                name: "B".into(),
                tickers: vec!["DOWN".into(), "FLAT".into(), "SHORT".into()],
            },
        ])
        .unwrap();
        let groups = universe.select(&[]).unwrap();

        let mut data = BatchData::new();
        data.insert("UP.IS".into(), rising("UP.IS", 90, 0.5));
        data.insert("DOWN.IS".into(), falling("DOWN.IS", 90, 0.5));
        data.insert("FLAT.IS".into(), recovering("FLAT.IS", 90));
        data.insert("SHORT.IS".into(), rising("SHORT.IS", 30, 0.5));

        let report = scan_universe(&groups, &data, ".IS");
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.skipped_for(SkipReason::InsufficientData), 1);
        // DOWN is visited once, under its first group
        assert_eq!(report.rows.iter().filter(|r| r.ticker == "DOWN").count(), 1);
        assert_eq!(report.rows.iter().find(|r| r.ticker == "DOWN").unwrap().group, "A");

        for pair in report.rows.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
        assert_eq!(report.rows[0].ticker, "UP");

        let status = |t: &str| report.rows.iter().find(|r| r.ticker == t).unwrap().status;
        assert_eq!(status("UP"), ZoneStatus::BuyZone);
        assert_eq!(status("DOWN"), ZoneStatus::BuyZone);
        assert_eq!(status("FLAT"), ZoneStatus::Normal);
    }
}
