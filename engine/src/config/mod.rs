// Engine configuration: runtime settings and the ticker universe.
pub mod settings;
pub mod universe;

pub use settings::{CsvSettings, EngineSettings};
pub use universe::{GroupDefinition, TickerGroup, Universe};
