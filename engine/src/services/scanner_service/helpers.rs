// Helpers shared by the scanner service handlers
use crate::analysis::TargetCalculator;
use crate::config::EngineSettings;
use crate::data::cache::{BatchKey, TtlCache};
use crate::data::{BatchData, MarketDataSource, MarketDataStore};
use shared::models::{Interval, Period, PriceSnapshot};
use shared::utils::normalize_symbol;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub type BatchCache = TtlCache<BatchKey, Arc<BatchData>>;

pub fn market_symbols<'a>(tickers: impl IntoIterator<Item = &'a String>, suffix: &str) -> Vec<String> {
    tickers.into_iter().map(|t| normalize_symbol(t, suffix)).collect()
}

/// Batch fetch through the TTL cache. The store lock is held only while
/// copying bars out.
pub async fn fetch_batch_cached(
    market_data_store: &Arc<RwLock<MarketDataStore>>,
    cache: &BatchCache,
    symbols: &[String],
    period: Period,
    interval: Interval,
) -> Arc<BatchData> {
    let key = BatchKey::new(symbols, period, interval);
    if let Some(hit) = cache.get(&key) {
        tracing::debug!(symbols = symbols.len(), %period, %interval, "Batch cache hit");
        return hit;
    }

    let store = market_data_store.read().await;
    let batch = Arc::new(store.fetch_batch(symbols, period, interval));
    drop(store);

    if batch.len() < symbols.len() {
        tracing::warn!(
            requested = symbols.len(),
            found = batch.len(),
            %interval,
            "Some symbols have no market data"
        );
    }
    cache.cleanup();
    cache.set(key, batch.clone());
    batch
}

/// Snapshots for the symbols that have one. Missing ones are left out and
/// surface later as missing fundamentals.
pub async fn fetch_snapshots(
    market_data_store: &Arc<RwLock<MarketDataStore>>,
    symbols: &[String],
) -> HashMap<String, PriceSnapshot> {
    let store = market_data_store.read().await;
    symbols
        .iter()
        .filter_map(|symbol| match store.fetch_snapshot(symbol) {
            Ok(snapshot) => Some((symbol.clone(), snapshot)),
            Err(e) => {
                tracing::debug!(symbol = %symbol, error = %e, "No snapshot");
                None
            }
        })
        .collect()
}

pub fn target_calculator(settings: &EngineSettings, overrides: Option<[f64; 3]>) -> TargetCalculator {
    TargetCalculator::new(overrides.unwrap_or(settings.target_percentages))
}
