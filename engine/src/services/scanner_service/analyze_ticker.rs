// Handler for the single-ticker analysis
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::target_calculator;
use crate::analysis::{analyze, TickerAnalysis};
use crate::config::EngineSettings;
use crate::data::{MarketDataSource, MarketDataStore};
use crate::error::EngineError;
use crate::services::AnalyzeRequest;
use shared::utils::normalize_symbol;

pub async fn handle_analyze_ticker(
    req_payload: AnalyzeRequest,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    settings: &EngineSettings,
) -> Result<TickerAnalysis, EngineError> {
    let symbol = normalize_symbol(&req_payload.symbol, &settings.market_suffix);

    let store = market_data_store.read().await;
    let series = store.fetch_series(&symbol, req_payload.start, req_payload.end, req_payload.interval);
    let snapshot = store.fetch_snapshot(&symbol);
    drop(store); // Explicitly drop lock after data retrieval

    let series = series.map_err(|e| {
        tracing::warn!(symbol = %symbol, interval = %req_payload.interval, error = %e, "No series to analyze");
        e
    })?;
    let snapshot = snapshot.map_err(|e| {
        if e.is_not_found() {
            tracing::warn!(symbol = %symbol, error = %e, "No snapshot for target calculation");
            EngineError::MissingFundamentals(symbol.clone())
        } else {
            tracing::error!(symbol = %symbol, error = %e, "Snapshot lookup failed");
            e
        }
    })?;

    let calculator = target_calculator(settings, req_payload.target_percentages);
    analyze(&series, &snapshot, &calculator)
}
