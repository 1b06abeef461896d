// engine/src/services/scanner_service/mod.rs
// ScannerService owns the shared store, the universe and the batch cache.
// Each request is handled in its own submodule.

use super::{
    AnalyzeRequest, CeilingScanRequest, IntradayCeilingRequest, LoadCsvRequest, LoadCsvResponse, MoversRequest,
    ScanRequest,
};
use crate::analysis::{IntradayCeiling, TickerAnalysis};
use crate::config::{EngineSettings, Universe};
use crate::data::cache::TtlCache;
use crate::data::market_data::MarketDataStore;
use crate::error::EngineError;
use crate::ranking::{BatchReport, BuyZoneRow, CeilingRow, MoverRow, UniverseRow};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub mod analyze_ticker;
pub mod helpers;
pub mod intraday_ceiling;
pub mod load_csv_data;
pub mod scan_buy_zone;
pub mod scan_ceiling;
pub mod scan_movers;
pub mod scan_universe;

use helpers::BatchCache;

pub struct ScannerService {
    market_data_store: Arc<RwLock<MarketDataStore>>,
    universe: Arc<Universe>,
    settings: Arc<EngineSettings>,
    batch_cache: Arc<BatchCache>,
}

impl ScannerService {
    pub fn new(
        market_data_store: Arc<RwLock<MarketDataStore>>,
        universe: Arc<Universe>,
        settings: Arc<EngineSettings>,
    ) -> Self {
        let batch_cache = Arc::new(TtlCache::new(Duration::from_secs(settings.cache_ttl_secs)));
        ScannerService {
            market_data_store,
            universe,
            settings,
            batch_cache,
        }
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub async fn load_csv_data(&self, req_payload: LoadCsvRequest) -> Result<LoadCsvResponse, EngineError> {
        tracing::info!(
            path = %req_payload.path.display(),
            symbol = ?req_payload.symbol,
            interval = %req_payload.interval,
            "Received LoadCsvRequest, dispatching to handler."
        );
        load_csv_data::handle_load_csv_data(
            req_payload,
            self.market_data_store.clone(),
            &self.settings,
            &self.batch_cache,
        )
        .await
    }

    pub async fn analyze_ticker(&self, req_payload: AnalyzeRequest) -> Result<TickerAnalysis, EngineError> {
        tracing::info!(
            symbol = %req_payload.symbol,
            start = ?req_payload.start,
            end = ?req_payload.end,
            interval = %req_payload.interval,
            "Received AnalyzeRequest, dispatching to handler."
        );
        analyze_ticker::handle_analyze_ticker(req_payload, self.market_data_store.clone(), &self.settings).await
    }

    pub async fn scan_buy_zone(&self, req_payload: ScanRequest) -> Result<BatchReport<BuyZoneRow>, EngineError> {
        tracing::info!(groups = ?req_payload.groups, "Received buy-zone ScanRequest, dispatching to handler.");
        scan_buy_zone::handle_scan_buy_zone(
            req_payload,
            self.market_data_store.clone(),
            &self.universe,
            &self.settings,
            &self.batch_cache,
        )
        .await
    }

    pub async fn scan_universe(&self, req_payload: ScanRequest) -> Result<BatchReport<UniverseRow>, EngineError> {
        tracing::info!(groups = ?req_payload.groups, "Received universe ScanRequest, dispatching to handler.");
        scan_universe::handle_scan_universe(
            req_payload,
            self.market_data_store.clone(),
            &self.universe,
            &self.settings,
            &self.batch_cache,
        )
        .await
    }

    pub async fn scan_ceiling(&self, req_payload: CeilingScanRequest) -> Result<BatchReport<CeilingRow>, EngineError> {
        tracing::info!(group = %req_payload.group, "Received CeilingScanRequest, dispatching to handler.");
        scan_ceiling::handle_scan_ceiling(
            req_payload,
            self.market_data_store.clone(),
            &self.universe,
            &self.settings,
            &self.batch_cache,
        )
        .await
    }

    pub async fn scan_movers(&self, req_payload: MoversRequest) -> Result<BatchReport<MoverRow>, EngineError> {
        tracing::info!(tickers = req_payload.tickers.len(), "Received MoversRequest, dispatching to handler.");
        scan_movers::handle_scan_movers(
            req_payload,
            self.market_data_store.clone(),
            &self.settings,
            &self.batch_cache,
        )
        .await
    }

    pub async fn intraday_ceiling(&self, req_payload: IntradayCeilingRequest) -> Result<IntradayCeiling, EngineError> {
        tracing::info!(symbol = %req_payload.symbol, "Received IntradayCeilingRequest, dispatching to handler.");
        intraday_ceiling::handle_intraday_ceiling(
            req_payload,
            self.market_data_store.clone(),
            &self.settings,
            &self.batch_cache,
        )
        .await
    }
}
