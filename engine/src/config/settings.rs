// Engine settings, loaded from a JSON file or the SCANNER_CONFIG environment variable
use crate::data::csv_parser::number_format::DecimalStyle;
use crate::error::EngineError;
use serde::{Deserialize, Deserializer};
use shared::models::{Interval, Period};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_ENV_VAR: &str = "SCANNER_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineSettings {
    pub data_dir: PathBuf,
    pub market_suffix: String,
    pub target_percentages: [f64; 3],
    #[serde(deserialize_with = "from_str_field")]
    pub batch_period: Period,
    #[serde(deserialize_with = "from_str_field")]
    pub ceiling_period: Period,
    #[serde(deserialize_with = "from_str_field")]
    pub movers_period: Period,
    #[serde(deserialize_with = "from_str_field")]
    pub movers_interval: Interval,
    #[serde(deserialize_with = "from_str_field")]
    pub intraday_period: Period,
    #[serde(deserialize_with = "from_str_field")]
    pub intraday_interval: Interval,
    pub cache_ttl_secs: u64,
    pub universe_path: Option<PathBuf>,
    pub csv: CsvSettings,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CsvSettings {
    pub delimiter: char,
    pub decimal: DecimalStyle,
}

impl Default for CsvSettings {
    fn default() -> Self {
        CsvSettings {
            delimiter: ',',
            decimal: DecimalStyle::Dot,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            data_dir: PathBuf::from("data"),
            market_suffix: ".IS".to_string(),
            target_percentages: [8.0, 15.0, 20.0],
            batch_period: Period::days(90),
            ceiling_period: Period::days(180),
            movers_period: Period::days(2),
            movers_interval: Interval::Hour1,
            intraday_period: Period::days(5),
            intraday_interval: Interval::Minute15,
            cache_ttl_secs: 300,
            universe_path: None,
            csv: CsvSettings::default(),
        }
    }
}

impl EngineSettings {
    /// Loads settings from `path`, falling back to the file named by
    /// `SCANNER_CONFIG`, then to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        match path.map(Path::to_path_buf).or(from_env) {
            Some(p) => Self::from_file(&p),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| match e {
            EngineError::ConfigError(msg) => {
                EngineError::ConfigError(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(content)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.target_percentages.iter().any(|p| !p.is_finite()) {
            return Err(EngineError::ConfigError(
                "Target percentages must be finite numbers".to_string(),
            ));
        }
        if self.cache_ttl_secs == 0 {
            return Err(EngineError::ConfigError(
                "cache_ttl_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn from_str_field<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}
