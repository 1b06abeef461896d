use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Market data error: {0}")]
    MarketDataError(String),

    #[error("Insufficient data for {symbol}: need {required} bars, have {available}")]
    InsufficientData {
        symbol: String,
        required: usize,
        available: usize,
    },

    #[error("Missing fundamentals for {0}")]
    MissingFundamentals(String),

    #[error("Retrieval failure for {symbol}: {reason}")]
    RetrievalFailure { symbol: String, reason: String },

    #[error("Internal processing error: {0}")]
    ProcessingError(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    /// Informational message for the presentation boundary. The full error is
    /// logged, never shown.
    pub fn user_message(&self) -> String {
        tracing::debug!(error = ?self, "Rendering engine error for display");
        match self {
            EngineError::InsufficientData { required, .. } => format!(
                "Not enough Close/Volume data for analysis (at least {} bars required).",
                required
            ),
            EngineError::MissingFundamentals(_) => {
                "Insufficient fundamental data (price, 52-week high/low) for this ticker.".to_string()
            }
            EngineError::MarketDataError(_) | EngineError::RetrievalFailure { .. } => {
                "Data unavailable. Check the ticker code.".to_string()
            }
            EngineError::ConfigError(msg) => format!("Configuration problem: {}", msg),
            EngineError::CsvSystemError { .. }
            | EngineError::CsvDataFormatError(_)
            | EngineError::IoError { .. } => "Market data files could not be read.".to_string(),
            EngineError::ProcessingError(_)
            | EngineError::AnyhowError(_) => "Analysis could not be completed.".to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::MarketDataError(msg) if msg.to_lowercase().contains("not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_hide_details() {
        let err = EngineError::RetrievalFailure {
            symbol: "XXXX.IS".to_string(),
            reason: "socket closed".to_string(),
        };
        assert!(!err.user_message().contains("socket"));
        assert!(err.user_message().contains("Data unavailable"));

        let err = EngineError::InsufficientData {
            symbol: "EREGL.IS".to_string(),
            required: 50,
            available: 12,
        };
        assert!(err.user_message().contains("50"));
        assert!(err.to_string().contains("have 12"));
    }

    #[test]
    fn test_not_found_detection() {
        assert!(EngineError::MarketDataError("No data found: symbol not found".to_string()).is_not_found());
        assert!(!EngineError::MarketDataError("store locked".to_string()).is_not_found());
    }
}
