// Handler for the session movers list
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::{fetch_batch_cached, market_symbols, BatchCache};
use crate::config::EngineSettings;
use crate::data::MarketDataStore;
use crate::error::EngineError;
use crate::ranking::{self, BatchReport, MoverRow};
use crate::services::MoversRequest;

pub async fn handle_scan_movers(
    req_payload: MoversRequest,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    settings: &EngineSettings,
    cache: &BatchCache,
) -> Result<BatchReport<MoverRow>, EngineError> {
    let tickers: Vec<String> = req_payload
        .tickers
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tickers.is_empty() {
        return Err(EngineError::ConfigError("No tickers given".to_string()));
    }

    let symbols = market_symbols(&tickers, &settings.market_suffix);
    let batch = fetch_batch_cached(
        &market_data_store,
        cache,
        &symbols,
        settings.movers_period,
        settings.movers_interval,
    )
    .await;
    Ok(ranking::rank_movers(&tickers, &batch, &settings.market_suffix))
}
