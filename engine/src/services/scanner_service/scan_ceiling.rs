// Handler for the ceiling ranking of one group
use std::sync::Arc;
use tokio::sync::RwLock;

use super::helpers::{fetch_batch_cached, market_symbols, BatchCache};
use crate::config::{EngineSettings, Universe};
use crate::data::MarketDataStore;
use crate::error::EngineError;
use crate::ranking::{self, BatchReport, CeilingRow};
use crate::services::CeilingScanRequest;
use shared::models::Interval;

pub async fn handle_scan_ceiling(
    req_payload: CeilingScanRequest,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    universe: &Universe,
    settings: &EngineSettings,
    cache: &BatchCache,
) -> Result<BatchReport<CeilingRow>, EngineError> {
    let group = universe.group(&req_payload.group).ok_or_else(|| {
        tracing::error!(group = %req_payload.group, "Unknown group requested for ceiling scan");
        EngineError::ConfigError(format!(
            "Unknown group '{}'. Available: {}",
            req_payload.group,
            universe.group_names().join(", ")
        ))
    })?;

    let symbols = market_symbols(&group.declared, &settings.market_suffix);
    let batch = fetch_batch_cached(&market_data_store, cache, &symbols, settings.ceiling_period, Interval::Day1).await;
    Ok(ranking::scan_ceiling(group, &batch, &settings.market_suffix))
}
