//! Error handling for payout
//!
//! Library operations return typed errors so callers can tell failure
//! categories apart. The binary and glue code use anyhow for context
//! chaining, through the `Result` alias below.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the dividend scrape pipeline. All of them abort the whole
/// scrape; no partial record list is ever returned.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{url} returned error status: {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("response body is not valid UTF-8")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("unable to parse dividends markup: {0}")]
    MarkupParse(String),

    #[error("nested <table> elements are not supported")]
    NestedTable,

    #[error("row {row}: dividend '{value}' is not a number")]
    ValueConversion {
        row: usize,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("row {row}: dividend '{value}' is not a finite number")]
    NonFiniteValue { row: usize, value: String },

    #[error("row {row}: missing column {index} (row has {len} entries)")]
    MissingColumn { row: usize, index: usize, len: usize },

    #[error("failed to serialize dividend records")]
    Serialize(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Short machine-friendly name of the failure category, used in logs.
    pub fn category(&self) -> &'static str {
        match self {
            ScrapeError::Network(_) | ScrapeError::HttpStatus { .. } => "network",
            ScrapeError::Decode(_) => "decode",
            ScrapeError::MarkupParse(_) | ScrapeError::NestedTable => "markup",
            ScrapeError::ValueConversion { .. }
            | ScrapeError::NonFiniteValue { .. }
            | ScrapeError::MissingColumn { .. } => "value",
            ScrapeError::Serialize(_) => "serialize",
        }
    }
}

/// Failures of the predictor registry.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("no model registered for {asset} at scale {scale}")]
    ModelNotFound { asset: String, scale: String },

    /// The model's own fault, passed through untouched.
    #[error(transparent)]
    Model(anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type alias for application level operations
pub type Result<T> = anyhow::Result<T>;
