//! Indicator window configuration

use serde::{Deserialize, Serialize};

/// Windows used by the signal engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Short moving average window
    pub short_window: usize,
    /// Long moving average window
    pub long_window: usize,
    /// RSI lookback
    pub rsi_period: usize,
    /// MACD fast EMA span
    pub macd_fast: usize,
    /// MACD slow EMA span
    pub macd_slow: usize,
    /// MACD signal line span
    pub macd_signal: usize,
    /// Bollinger window
    pub bb_period: usize,
    /// Bollinger width in standard deviations
    pub bb_std_dev: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            short_window: 5,
            long_window: 50,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            bb_std_dev: 2.0,
        }
    }
}

impl IndicatorConfig {
    /// Number of bars needed before the first complete row can exist
    pub fn warmup_bars(&self) -> usize {
        self.long_window
            .max(self.short_window)
            .max(self.rsi_period + 1)
            .max(self.bb_period)
    }
}
