// Market data: file loading, in-memory store, sanitization and batch caching
pub mod cache;
pub mod csv_parser;
pub mod market_data;
pub mod sanitizer;
pub mod source;

pub use market_data::MarketDataStore;
pub use source::{BatchData, MarketDataSource};
