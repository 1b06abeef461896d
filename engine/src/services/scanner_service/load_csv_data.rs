// Handler for loading price files into the store
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::BatchCache;
use crate::config::EngineSettings;
use crate::data::csv_parser::OhlcvCsvParser;
use crate::data::market_data::MarketDataStore;
use crate::error::EngineError;
use crate::services::{LoadCsvRequest, LoadCsvResponse};
use shared::utils::normalize_symbol;

pub async fn handle_load_csv_data(
    req_payload: LoadCsvRequest,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    settings: &EngineSettings,
    cache: &BatchCache,
) -> Result<LoadCsvResponse, EngineError> {
    let result = load_into_store(&req_payload, &market_data_store, settings).await;
    // Cached batches no longer reflect the store, even after a partial load
    cache.clear();
    result
}

async fn load_into_store(
    req_payload: &LoadCsvRequest,
    market_data_store: &Arc<RwLock<MarketDataStore>>,
    settings: &EngineSettings,
) -> Result<LoadCsvResponse, EngineError> {
    let path = req_payload.path.as_path();

    let response = if path.is_dir() {
        let mut store = market_data_store.write().await;
        let before: usize = store.symbols().len();
        let files_loaded = store.load_directory(path, req_payload.interval, &settings.market_suffix, settings.csv)?;
        let symbols = store.symbols().len();
        drop(store);
        LoadCsvResponse {
            success: true,
            message: format!(
                "Loaded {} files from {} ({} symbols, {} new)",
                files_loaded,
                path.display(),
                symbols,
                symbols - before
            ),
            files_loaded,
            bars_loaded: 0,
        }
    } else {
        let raw_symbol = match (&req_payload.symbol, path.file_stem().and_then(|s| s.to_str())) {
            (Some(symbol), _) => symbol.clone(),
            (None, Some(stem)) => stem.to_string(),
            (None, None) => {
                return Err(EngineError::ConfigError(format!(
                    "Cannot derive a symbol from path '{}'",
                    path.display()
                )))
            }
        };
        let symbol = normalize_symbol(&raw_symbol, &settings.market_suffix);
        let series = OhlcvCsvParser::load_series(path, &symbol, settings.csv)?;
        let parsed = series.len();

        let mut store = market_data_store.write().await;
        let added = store.add_bars(&symbol, req_payload.interval, series.bars);
        drop(store);

        tracing::info!(symbol = %symbol, parsed, added, interval = %req_payload.interval, "Stored CSV bars");
        LoadCsvResponse {
            success: true,
            message: format!("Loaded {} bars for symbol {}", added, symbol),
            files_loaded: 1,
            bars_loaded: added,
        }
    };
    Ok(response)
}
