//! Technical indicators module
//!
//! Streaming indicators over close prices. SMA, EMA and MACD wrap the `ta`
//! crate; RSI and Bollinger Bands are computed over explicit trailing
//! windows (simple-mean RSI, sample standard deviation).

pub mod bb;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bb::*;
pub use ema::*;
pub use macd::*;
pub use rsi::*;
pub use sma::*;

/// Indicator trait for all indicators
pub trait Indicator {
    /// Get the name of the indicator
    fn name(&self) -> &str;

    /// Update indicator with new value
    fn update(&mut self, value: f64);

    /// Get current indicator value, `None` while undefined
    fn value(&self) -> Option<f64>;

    /// Check if indicator has seen enough data
    fn is_ready(&self) -> bool;
}

/// Feed a series through an indicator, collecting its value after each step
pub(crate) fn run_series<I: Indicator>(mut indicator: I, values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|&value| {
            indicator.update(value);
            indicator.value()
        })
        .collect()
}
