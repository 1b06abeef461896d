use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use engine::config::{EngineSettings, Universe};
use engine::data::MarketDataStore;
use engine::error::EngineError;
use engine::report::{self, DisplayTickerReport};
use engine::services::{
    AnalyzeRequest, CeilingScanRequest, IntradayCeilingRequest, LoadCsvRequest, MoversRequest,
    ScanRequest, ScannerService,
};
use shared::models::Interval;

#[derive(Parser)]
#[command(name = "bist-scanner")]
#[command(about = "Technical signal scanner for BIST equities", long_about = None)]
pub struct Cli {
    /// Settings JSON file (falls back to $SCANNER_CONFIG, then defaults)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory with one daily CSV per ticker; intraday files go in
    /// sub-directories named after the interval (15m, 1h, ...)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full report for one ticker: trend, outlook, targets and levels
    Analyze {
        symbol: String,
        /// First day included (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day included (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long, default_value = "1d")]
        interval: Interval,
        /// Three target percentages, e.g. 8,15,20
        #[arg(long, value_delimiter = ',')]
        targets: Option<Vec<f64>>,
    },
    /// Tickers with RSI14 below 30 or MA20 above MA50, lowest RSI first
    BuyZone {
        /// Restrict to these groups (repeatable); all groups by default
        #[arg(short, long = "group")]
        groups: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        targets: Option<Vec<f64>>,
    },
    /// Every ticker of the universe ranked by upside probability
    Scan {
        #[arg(short, long = "group")]
        groups: Vec<String>,
    },
    /// Limit-up likelihood ranking for one group
    Ceiling { group: String },
    /// Session change ranking for an ad-hoc ticker list
    Movers {
        #[arg(required = true)]
        tickers: Vec<String>,
    },
    /// Intraday ceiling probability for one ticker
    IntradayCeiling { symbol: String },
    /// List configured groups and their tickers
    Groups,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let settings = EngineSettings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let universe = match &settings.universe_path {
        Some(path) => Universe::from_file(path),
        None => Universe::load_default(),
    }
    .context("Failed to load ticker universe")?;

    if let Commands::Groups = cli.command {
        for group in universe.groups() {
            println!("📂 {} ({} tickers)", group.name, group.declared.len());
            println!("   {}", group.declared.join(", "));
        }
        return Ok(());
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| settings.data_dir.clone());
    let store = Arc::new(RwLock::new(MarketDataStore::new()));
    let service = ScannerService::new(store, Arc::new(universe), Arc::new(settings));
    load_data_dir(&service, &data_dir).await?;

    let json = cli.json;
    let outcome = match cli.command {
        Commands::Analyze {
            symbol,
            start,
            end,
            interval,
            targets,
        } => {
            let req = AnalyzeRequest {
                symbol,
                start: start.map(start_of_day),
                end: end.map(end_of_day),
                interval,
                target_percentages: targets.as_deref().map(as_triple).transpose()?,
            };
            service.analyze_ticker(req).await.map(|analysis| {
                let display = DisplayTickerReport::from(&analysis);
                emit(json, &display, || display.render())
            })
        }
        Commands::BuyZone { groups, targets } => {
            let req = ScanRequest {
                groups,
                target_percentages: targets.as_deref().map(as_triple).transpose()?,
            };
            service.scan_buy_zone(req).await.map(|r| {
                log_skipped(&report::skipped_summary(&r));
                emit(json, &r, || report::render_buy_zone(&r))
            })
        }
        Commands::Scan { groups } => {
            let req = ScanRequest {
                groups,
                target_percentages: None,
            };
            service.scan_universe(req).await.map(|r| {
                log_skipped(&report::skipped_summary(&r));
                emit(json, &r, || report::render_universe(&r))
            })
        }
        Commands::Ceiling { group } => service
            .scan_ceiling(CeilingScanRequest { group })
            .await
            .map(|r| {
                log_skipped(&report::skipped_summary(&r));
                emit(json, &r, || report::render_ceiling(&r))
            }),
        Commands::Movers { tickers } => service
            .scan_movers(MoversRequest { tickers })
            .await
            .map(|r| {
                log_skipped(&report::skipped_summary(&r));
                emit(json, &r, || report::render_movers(&r))
            }),
        Commands::IntradayCeiling { symbol } => service
            .intraday_ceiling(IntradayCeilingRequest { symbol })
            .await
            .map(|r| emit(json, &r, || report::render_intraday(&r))),
        Commands::Groups => return Ok(()),
    };

    match outcome {
        Ok(text) => {
            print!("{}", text);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            println!("⚠️  {}", e.user_message());
            std::process::exit(1);
        }
    }
}

async fn load_data_dir(service: &ScannerService, data_dir: &Path) -> Result<()> {
    if !data_dir.is_dir() {
        tracing::warn!(dir = %data_dir.display(), "Data directory not found, store stays empty");
        return Ok(());
    }
    let mut sources = vec![(data_dir.to_path_buf(), Interval::Day1)];
    for interval in [
        Interval::Minute15,
        Interval::Minute30,
        Interval::Hour1,
        Interval::Week1,
        Interval::Month1,
    ] {
        let sub = data_dir.join(interval.as_str());
        if sub.is_dir() {
            sources.push((sub, interval));
        }
    }

    for (path, interval) in sources {
        let resp = service
            .load_csv_data(LoadCsvRequest {
                path: path.clone(),
                symbol: None,
                interval,
            })
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?;
        tracing::info!(files = resp.files_loaded, "{}", resp.message);
    }
    Ok(())
}

fn emit<T: Serialize>(json: bool, value: &T, table: impl FnOnce() -> String) -> String {
    if !json {
        return table();
    }
    match serde_json::to_string_pretty(value) {
        Ok(s) => format!("{}\n", s),
        Err(e) => format!("{}\n", EngineError::ProcessingError(e.to_string()).user_message()),
    }
}

fn log_skipped(summary: &str) {
    if !summary.is_empty() {
        tracing::info!("{}", summary.replace('\n', "; "));
    }
}

fn as_triple(values: &[f64]) -> Result<[f64; 3]> {
    <[f64; 3]>::try_from(values)
        .map_err(|_| anyhow::anyhow!("--targets takes exactly three percentages, got {}", values.len()))
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::default()).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + chrono::Duration::days(1) - chrono::Duration::seconds(1)
}
