// Handler for the buy-zone ranking
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::{fetch_batch_cached, fetch_snapshots, market_symbols, target_calculator, BatchCache};
use crate::config::{EngineSettings, Universe};
use crate::data::MarketDataStore;
use crate::error::EngineError;
use crate::ranking::{self, BatchReport, BuyZoneRow};
use crate::services::ScanRequest;
use shared::models::Interval;

pub async fn handle_scan_buy_zone(
    req_payload: ScanRequest,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    universe: &Universe,
    settings: &EngineSettings,
    cache: &BatchCache,
) -> Result<BatchReport<BuyZoneRow>, EngineError> {
    let groups = universe.select(&req_payload.groups)?;
    let symbols = market_symbols(groups.iter().flat_map(|g| g.members.iter()), &settings.market_suffix);

    let batch = fetch_batch_cached(&market_data_store, cache, &symbols, settings.batch_period, Interval::Day1).await;
    let snapshots = fetch_snapshots(&market_data_store, &symbols).await;
    let calculator = target_calculator(settings, req_payload.target_percentages);

    Ok(ranking::scan_buy_zone(
        &groups,
        &batch,
        &snapshots,
        &calculator,
        &settings.market_suffix,
    ))
}
