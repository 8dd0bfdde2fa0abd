//! Trading loop configuration

use crate::config::IndicatorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the signal engine takes its price history from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    /// Resample the persisted snapshot sequence
    Snapshots,
    /// Resample minute bars fetched from CryptoCompare
    CryptoCompare,
}

/// Trading configuration, loaded from the JSON config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    /// Exchange product (e.g., "BTC_JPY")
    pub product_code: String,
    /// Seconds between readiness polls / snapshot captures
    pub observe_interval_secs: u64,
    /// Minimum seconds between two decision cycles
    pub decide_interval_secs: u64,
    /// Consecutive failed cycles before the loop stops
    pub max_consecutive_errors: u32,
    /// Pause between a cancel and its replacement order
    pub settle_delay_secs: u64,
    /// Orders smaller than this are dropped
    pub min_order_size: f64,
    /// Decimal places kept on price and size before transmission
    pub order_decimals: u32,
    /// Order expiry passed to the exchange
    pub minute_to_expire: u32,
    /// Maximum number of snapshots kept on disk
    pub snapshot_capacity: usize,
    /// Snapshot file location
    pub snapshot_file: PathBuf,
    /// Resampling bucket width
    pub bar_interval_secs: i64,
    /// Number of complete signal rows handed to the decision authority
    pub signal_rows: usize,
    /// Number of recent executions fetched per decision
    pub execution_count: usize,
    /// Fraction withheld from available balances (e.g., 0.05 = 5%)
    pub balance_haircut: f64,
    /// Price history used for signals
    pub signal_source: SignalSource,
    /// Minute bars requested from the bar source
    pub history_limit: u32,
    /// Prompt template file for the decision authority
    pub prompt_file: PathBuf,
    /// Indicator windows
    pub indicators: IndicatorConfig,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            product_code: "BTC_JPY".to_string(),
            observe_interval_secs: 60,
            decide_interval_secs: 300,
            max_consecutive_errors: 3,
            settle_delay_secs: 3,
            min_order_size: 0.0001,
            order_decimals: 8,
            minute_to_expire: 30,
            snapshot_capacity: 100,
            snapshot_file: PathBuf::from("logs/price_cache.json"),
            bar_interval_secs: 300,
            signal_rows: 50,
            execution_count: 15,
            balance_haircut: 0.05,
            signal_source: SignalSource::CryptoCompare,
            history_limit: 1000,
            prompt_file: PathBuf::from("messages.json"),
            indicators: IndicatorConfig::default(),
        }
    }
}

impl TradingConfig {
    pub fn observe_interval(&self) -> Duration {
        Duration::from_secs(self.observe_interval_secs)
    }

    pub fn decide_interval(&self) -> Duration {
        Duration::from_secs(self.decide_interval_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn bar_interval(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.bar_interval_secs)
    }

    /// Split the product code into (base, quote), e.g. "BTC_JPY" -> ("BTC", "JPY")
    pub fn currencies(&self) -> Option<(String, String)> {
        let (base, quote) = self.product_code.split_once('_')?;
        if base.is_empty() || quote.is_empty() {
            return None;
        }
        Some((base.to_uppercase(), quote.to_uppercase()))
    }
}
