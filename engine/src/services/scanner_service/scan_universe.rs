// Handler for the unfiltered universe scan
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::{fetch_batch_cached, market_symbols, BatchCache};
use crate::config::{EngineSettings, Universe};
use crate::data::MarketDataStore;
use crate::error::EngineError;
use crate::ranking::{self, BatchReport, UniverseRow};
use crate::services::ScanRequest;
use shared::models::Interval;

pub async fn handle_scan_universe(
    req_payload: ScanRequest,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    universe: &Universe,
    settings: &EngineSettings,
    cache: &BatchCache,
) -> Result<BatchReport<UniverseRow>, EngineError> {
    let groups = universe.select(&req_payload.groups)?;
    let symbols = market_symbols(groups.iter().flat_map(|g| g.members.iter()), &settings.market_suffix);
    let batch = fetch_batch_cached(&market_data_store, cache, &symbols, settings.batch_period, Interval::Day1).await;
    Ok(ranking::scan_universe(&groups, &batch, &settings.market_suffix))
}
