//! MACD (Moving Average Convergence Divergence) indicator

use crate::Result;
use ta::indicators::MovingAverageConvergenceDivergence;
use ta::Next;

/// MACD indicator wrapper. Fast/slow/signal EMAs are all first-value
/// seeded, so every output is defined from the first close.
#[derive(Debug)]
pub struct MACD {
    inner: MovingAverageConvergenceDivergence,
}

impl MACD {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Result<Self> {
        let inner = MovingAverageConvergenceDivergence::new(fast_period, slow_period, signal_period)
            .map_err(|e| {
                anyhow::anyhow!(
                    "invalid MACD periods {}/{}/{}: {:?}",
                    fast_period,
                    slow_period,
                    signal_period,
                    e
                )
            })?;
        Ok(Self { inner })
    }

    pub fn update(&mut self, value: f64) -> MACDResult {
        let output = self.inner.next(value);
        MACDResult {
            macd: output.macd,
            signal: output.signal,
            histogram: output.histogram,
        }
    }
}

/// MACD result structure
#[derive(Debug, Clone, PartialEq)]
pub struct MACDResult {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD line, signal line and histogram at every position of `values`
pub fn macd_series(
    values: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<Vec<MACDResult>> {
    let mut macd = MACD::new(fast_period, slow_period, signal_period)?;
    Ok(values.iter().map(|&v| macd.update(v)).collect())
}
