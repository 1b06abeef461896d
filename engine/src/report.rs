//! Presentation boundary.
//!
//! Results stay numeric through ranking; rounding and text happen here, after
//! the rows are sorted. Prices, moving averages and levels are shown with two
//! decimals, RSI and probabilities with one, volumes in millions.

use crate::analysis::{IntradayCeiling, TickerAnalysis};
use crate::ranking::{BatchReport, BuyZoneRow, CeilingRow, MoverRow, UniverseRow};
use serde::Serialize;
use shared::utils::round_to;
use std::fmt::Write;

pub const NO_BUY_ZONE: &str = "No tickers are currently in the buy zone.";
pub const NO_RESULTS: &str = "No qualifying results.";

fn price(v: f64) -> f64 {
    round_to(v, 2)
}

fn one_decimal(v: f64) -> f64 {
    round_to(v, 1)
}

fn millions(v: f64) -> f64 {
    round_to(v / 1e6, 2)
}

fn opt(v: Option<f64>, decimals: usize) -> String {
    v.map_or_else(|| "-".to_string(), |x| format!("{:.*}", decimals, x))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayTickerReport {
    pub symbol: String,
    pub price: f64,
    pub trend: String,
    pub outlook: String,
    pub probability: f64,
    pub rsi14: f64,
    pub ma20: f64,
    pub ma50: f64,
    pub targets: [f64; 3],
    pub support: f64,
    pub resistance_short: f64,
    pub resistance_mid: f64,
    pub resistance_long: f64,
}

impl From<&TickerAnalysis> for DisplayTickerReport {
    fn from(a: &TickerAnalysis) -> Self {
        DisplayTickerReport {
            symbol: a.symbol.clone(),
            price: price(a.price),
            trend: a.trend.to_string(),
            outlook: a.outlook.to_string(),
            probability: one_decimal(a.estimate.probability),
            rsi14: one_decimal(a.rsi14),
            ma20: price(a.ma20),
            ma50: price(a.ma50),
            targets: a.targets.targets.map(price),
            support: price(a.targets.support),
            resistance_short: price(a.targets.resistance_short),
            resistance_mid: price(a.targets.resistance_mid),
            resistance_long: price(a.targets.resistance_long),
        }
    }
}

impl DisplayTickerReport {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}  current price: {:.2}", self.symbol, self.price);
        let _ = writeln!(out, "Trend: {}", self.trend);
        let _ = writeln!(out, "Next session: {} ({:.1}%)", self.outlook, self.probability);
        let _ = writeln!(out, "RSI: {:.1}", self.rsi14);
        let _ = writeln!(out, "MA20: {:.2} | MA50: {:.2}", self.ma20, self.ma50);
        let _ = writeln!(out);
        let _ = writeln!(out, "Targets:");
        for (i, target) in self.targets.iter().enumerate() {
            let _ = writeln!(out, "  Target {}: {:.2}", i + 1, target);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Support / resistance:");
        let _ = writeln!(out, "  Support: {:.2}", self.support);
        let _ = writeln!(out, "  Short-term resistance (20 bars): {:.2}", self.resistance_short);
        let _ = writeln!(out, "  Mid-term resistance (50 bars): {:.2}", self.resistance_mid);
        let _ = writeln!(out, "  Long-term resistance (52-week high): {:.2}", self.resistance_long);
        out
    }
}

pub fn render_buy_zone(report: &BatchReport<BuyZoneRow>) -> String {
    if report.is_empty() {
        return format!("{}\n", NO_BUY_ZONE);
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<8} {:>10} {:>10} {:>10} {:>6} {:>10} {:>10} {:>10}  {}",
        "Ticker", "Group", "Price", "MA20", "MA50", "RSI14", "Target1", "Target2", "Target3", "Outlook"
    );
    for r in &report.rows {
        let _ = writeln!(
            out,
            "{:<8} {:<8} {:>10.2} {:>10.2} {:>10.2} {:>6.1} {:>10.2} {:>10.2} {:>10.2}  {} ({:.1}%)",
            r.ticker,
            r.group,
            r.price,
            r.ma20,
            r.ma50,
            r.rsi14,
            r.targets[0],
            r.targets[1],
            r.targets[2],
            r.outlook,
            r.probability
        );
    }
    out
}

pub fn render_universe(report: &BatchReport<UniverseRow>) -> String {
    if report.is_empty() {
        return format!("{}\n", NO_RESULTS);
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<8} {:>10} {:>10} {:>10} {:>6} {:>8}  {}",
        "Ticker", "Group", "Price", "MA20", "MA50", "RSI14", "P(%)", "Status"
    );
    for r in &report.rows {
        let _ = writeln!(
            out,
            "{:<8} {:<8} {:>10.2} {:>10.2} {:>10.2} {:>6.1} {:>8.1}  {}",
            r.ticker, r.group, r.price, r.ma20, r.ma50, r.rsi14, r.probability, r.status
        );
    }
    out
}

pub fn render_ceiling(report: &BatchReport<CeilingRow>) -> String {
    if report.is_empty() {
        return format!("{}\n", NO_RESULTS);
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:>9} {:>6} {:>10} {:>12} {:>6}  {}",
        "Ticker", "Change%", "RSI14", "Vol(M)", "AvgVol(M)", "Score", "Outlook"
    );
    for r in &report.rows {
        let _ = writeln!(
            out,
            "{:<8} {:>8.2}% {:>6.1} {:>10.2} {:>12.2} {:>6}  {}",
            r.ticker,
            r.pct_change,
            r.rsi14,
            millions(r.volume),
            millions(r.avg_volume),
            r.score,
            r.outlook
        );
    }
    out
}

pub fn render_movers(report: &BatchReport<MoverRow>) -> String {
    if report.is_empty() {
        return "No data could be retrieved.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<8} {:>10} {:>9} {:>6}", "Ticker", "Price", "Change%", "RSI14");
    for r in &report.rows {
        let _ = writeln!(
            out,
            "{:<8} {:>10.2} {:>8.2}% {:>6}",
            r.ticker,
            price(r.price),
            price(r.change_pct),
            opt(r.rsi14, 1)
        );
    }
    out
}

pub fn render_intraday(result: &IntradayCeiling) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  price: {:.2}", result.symbol, result.price);
    let _ = writeln!(out, "Session change: {}%", opt(result.change_pct, 2));
    let _ = writeln!(out, "RSI (14): {}", opt(result.rsi, 2));
    let _ = writeln!(out, "Volume vs average: {:.2}x", result.volume_ratio);
    let _ = writeln!(out, "Estimated ceiling probability: {}%", result.probability);
    out
}

/// One line per skip reason with its count, for the log or a footer.
pub fn skipped_summary<T>(report: &BatchReport<T>) -> String {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for s in &report.skipped {
        let reason = s.reason.to_string();
        match counts.iter_mut().find(|(r, _)| *r == reason) {
            Some((_, n)) => *n += 1,
            None => counts.push((reason, 1)),
        }
    }
    counts
        .iter()
        .map(|(reason, n)| format!("{} skipped: {}", n, reason))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{CeilingOutlook, DirectionalEstimate, DirectionalOutlook, TargetSet, TrendLabel};
    use crate::ranking::{SkipReason, SkippedTicker};

    fn analysis() -> TickerAnalysis {
        TickerAnalysis {
            symbol: "EREGL.IS".into(),
            price: 41.234,
            trend: TrendLabel::Uptrend,
            outlook: DirectionalOutlook::MildUpside,
            estimate: DirectionalEstimate {
                probability: 61.666,
                trend_pct: 56.666,
                ema_bonus: 0.0,
                rsi_bonus: 0.0,
                volume_bonus: 5.0,
            },
            rsi14: 47.26,
            ma20: 40.005,
            ma50: 39.111,
            targets: TargetSet {
                price: 41.234,
                year_high: 43.0,
                year_low: 30.0,
                targets: [44.53272, 47.4191, 49.4808],
                support: 40.85,
                resistance_short: 42.0,
                resistance_mid: 42.5,
                resistance_long: 43.0,
                trend: TrendLabel::Uptrend,
            },
        }
    }

    #[test]
    fn test_display_rounding() {
        let display = DisplayTickerReport::from(&analysis());
        assert_eq!(display.price, 41.23);
        assert_eq!(display.rsi14, 47.3);
        assert_eq!(display.probability, 61.7);
        assert_eq!(display.targets, [44.53, 47.42, 49.48]);
        assert_eq!(display.ma50, 39.11);
        let text = display.render();
        assert!(text.contains("Mild upside expected (61.7%)"));
        assert!(text.contains("Target 2: 47.42"));
        assert!(text.contains("Trend: Uptrend"));
    }

    #[test]
    fn test_empty_buy_zone_message() {
        let report: BatchReport<BuyZoneRow> = BatchReport::default();
        assert_eq!(render_buy_zone(&report).trim(), NO_BUY_ZONE);
    }

    #[test]
    fn test_ceiling_table_formats_volume_in_millions() {
        let report = BatchReport {
            rows: vec![CeilingRow {
                ticker: "SASA".into(),
                group: "YILDIZ".into(),
                pct_change: 9.456,
                rsi14: 71.24,
                volume: 12_345_678.0,
                avg_volume: 4_000_000.0,
                score: 85,
                outlook: CeilingOutlook::High,
            }],
            skipped: vec![],
        };
        let text = render_ceiling(&report);
        let line = text.lines().nth(1).unwrap();
        assert!(line.contains("9.46%"));
        assert!(line.contains("12.35"));
        assert!(line.contains("4.00"));
        assert!(line.contains("High ceiling likelihood"));
    }

    #[test]
    fn test_skipped_summary() {
        let skip = |t: &str, reason| SkippedTicker {
            ticker: t.into(),
            group: "G".into(),
            reason,
        };
        let report: BatchReport<MoverRow> = BatchReport {
            rows: vec![],
            skipped: vec![
                skip("A", SkipReason::InsufficientData),
                skip("B", SkipReason::RetrievalFailure),
                skip("C", SkipReason::InsufficientData),
            ],
        };
        assert_eq!(
            skipped_summary(&report),
            "2 skipped: insufficient data\n1 skipped: retrieval failure"
        );
    }
}
