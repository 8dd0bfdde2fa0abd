//! Error types shared across the trading pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Snapshot persistence failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot encoding: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The stage of a trading cycle that failed
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("readiness check failed: {0:#}")]
    Readiness(anyhow::Error),
    #[error("market data fetch failed: {0:#}")]
    MarketData(anyhow::Error),
    #[error("signal computation failed: {0:#}")]
    Signals(anyhow::Error),
    #[error("decision authority failed: {0:#}")]
    Decision(anyhow::Error),
    #[error("dispatch failed: {0:#}")]
    Dispatch(anyhow::Error),
}

/// A decision payload that could not be decoded
#[derive(Debug, Error)]
pub enum DecisionParseError {
    #[error("unknown decision function '{0}'")]
    UnknownFunction(String),
    #[error("invalid arguments for '{function}': {source}")]
    InvalidArguments {
        function: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("'{0}' requires a price")]
    MissingPrice(String),
}
