//! RSI (Relative Strength Index) indicator

use crate::indicators::{run_series, Indicator};
use crate::Result;
use std::collections::VecDeque;

/// RSI from simple averages of the trailing `period` close-to-close gains
/// and losses.
///
/// Undefined until `period` deltas have been seen, and undefined whenever
/// the average loss over the window is zero.
#[derive(Debug)]
pub struct RSI {
    period: usize,
    prev: Option<f64>,
    gains: VecDeque<f64>,
    losses: VecDeque<f64>,
    last_value: Option<f64>,
}

impl RSI {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            anyhow::bail!("invalid RSI period 0");
        }
        Ok(Self {
            period,
            prev: None,
            gains: VecDeque::with_capacity(period + 1),
            losses: VecDeque::with_capacity(period + 1),
            last_value: None,
        })
    }

    fn compute(&self) -> Option<f64> {
        if self.gains.len() < self.period {
            return None;
        }
        // Summed from the window each time so a loss-free window is exactly zero
        let avg_gain = self.gains.iter().sum::<f64>() / self.period as f64;
        let avg_loss = self.losses.iter().sum::<f64>() / self.period as f64;
        if avg_loss <= 0.0 {
            return None;
        }
        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

impl Indicator for RSI {
    fn name(&self) -> &str {
        "RSI"
    }

    fn update(&mut self, value: f64) {
        if let Some(prev) = self.prev {
            let delta = value - prev;
            self.gains.push_back(delta.max(0.0));
            self.losses.push_back((-delta).max(0.0));
            if self.gains.len() > self.period {
                self.gains.pop_front();
                self.losses.pop_front();
            }
        }
        self.prev = Some(value);
        self.last_value = self.compute();
    }

    fn value(&self) -> Option<f64> {
        self.last_value
    }

    fn is_ready(&self) -> bool {
        self.gains.len() >= self.period
    }
}

/// RSI value at every position of `values`
pub fn rsi_series(values: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    Ok(run_series(RSI::new(period)?, values))
}
