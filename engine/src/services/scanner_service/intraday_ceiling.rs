// Handler for the intraday ceiling probability of one ticker
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::{fetch_batch_cached, BatchCache};
use crate::analysis::{intraday_ceiling, IntradayCeiling};
use crate::config::EngineSettings;
use crate::data::MarketDataStore;
use crate::error::EngineError;
use crate::services::IntradayCeilingRequest;
use shared::utils::normalize_symbol;

pub async fn handle_intraday_ceiling(
    req_payload: IntradayCeilingRequest,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    settings: &EngineSettings,
    cache: &BatchCache,
) -> Result<IntradayCeiling, EngineError> {
    let symbol = normalize_symbol(&req_payload.symbol, &settings.market_suffix);
    let symbols = vec![symbol.clone()];
    let batch = fetch_batch_cached(
        &market_data_store,
        cache,
        &symbols,
        settings.intraday_period,
        settings.intraday_interval,
    )
    .await;

    batch
        .get(&symbol)
        .and_then(intraday_ceiling)
        .ok_or_else(|| {
            tracing::warn!(symbol = %symbol, interval = %settings.intraday_interval, "No intraday data");
            EngineError::MarketDataError(format!(
                "Market data not found for symbol '{}' and interval {}",
                symbol, settings.intraday_interval
            ))
        })
}
