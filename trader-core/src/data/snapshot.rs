//! Market snapshot records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prices carried by a snapshot: a raw ticker reading or an OHLC bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Quote {
    /// Ticker reading: last traded price and top of book
    Tick {
        ltp: f64,
        best_bid: f64,
        best_ask: f64,
    },
    /// Aggregated bar
    Bar {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
}

/// One market observation. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Observation time (bar start for bars)
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub quote: Quote,
    /// Traded volume
    pub volume: f64,
}

impl Snapshot {
    /// Snapshot from a ticker reading
    pub fn tick(timestamp: DateTime<Utc>, ltp: f64, best_bid: f64, best_ask: f64, volume: f64) -> Self {
        Self {
            timestamp,
            quote: Quote::Tick {
                ltp,
                best_bid,
                best_ask,
            },
            volume,
        }
    }

    /// Snapshot from an OHLCV bar
    pub fn bar(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            quote: Quote::Bar {
                open,
                high,
                low,
                close,
            },
            volume,
        }
    }

    pub fn open(&self) -> f64 {
        match self.quote {
            Quote::Tick { ltp, .. } => ltp,
            Quote::Bar { open, .. } => open,
        }
    }

    pub fn high(&self) -> f64 {
        match self.quote {
            Quote::Tick { ltp, .. } => ltp,
            Quote::Bar { high, .. } => high,
        }
    }

    pub fn low(&self) -> f64 {
        match self.quote {
            Quote::Tick { ltp, .. } => ltp,
            Quote::Bar { low, .. } => low,
        }
    }

    /// Last price (ltp for ticks, close for bars)
    pub fn close(&self) -> f64 {
        match self.quote {
            Quote::Tick { ltp, .. } => ltp,
            Quote::Bar { close, .. } => close,
        }
    }
}
