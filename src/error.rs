//! Error types for fraud_fx_stats

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for fraud_fx_stats
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Parse error at line {line}, column '{column}': {message}")]
    ParseError {
        line: u64,
        column: String,
        message: String,
    },

    #[error("Column '{0}' not found")]
    MissingColumn(String),

    #[error("Invalid exchange rate for {currency} on {date}: {rate}")]
    InvalidRate {
        date: NaiveDate,
        currency: String,
        rate: f64,
    },

    #[error("Duplicate exchange rate for {currency} on {date}")]
    DuplicateRate { date: NaiveDate, currency: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Chart error: {0}")]
    ChartError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for fraud_fx_stats operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
