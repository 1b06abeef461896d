// Service layer: request and response types plus the scanner service
pub mod scanner_service;

pub use scanner_service::ScannerService;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::models::Interval;
use std::path::PathBuf;

/// Loads a single price file (with `symbol`) or a whole directory.
#[derive(Debug, Clone)]
pub struct LoadCsvRequest {
    pub path: PathBuf,
    pub symbol: Option<String>,
    pub interval: Interval,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadCsvResponse {
    pub success: bool,
    pub message: String,
    pub files_loaded: usize,
    pub bars_loaded: usize,
}

#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub symbol: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub interval: Interval,
    /// Overrides the configured target percentages.
    pub target_percentages: Option<[f64; 3]>,
}

#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    /// Empty selects every group.
    pub groups: Vec<String>,
    pub target_percentages: Option<[f64; 3]>,
}

#[derive(Debug, Clone)]
pub struct CeilingScanRequest {
    pub group: String,
}

#[derive(Debug, Clone)]
pub struct MoversRequest {
    pub tickers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct IntradayCeilingRequest {
    pub symbol: String,
}
