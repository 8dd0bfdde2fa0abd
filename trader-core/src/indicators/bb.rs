//! Bollinger Bands indicator

use crate::indicators::Indicator;
use crate::Result;
use std::collections::VecDeque;

/// Bollinger Bands: trailing mean ± `std_dev` sample standard deviations
#[derive(Debug)]
pub struct BollingerBands {
    period: usize,
    std_dev: f64,
    window: VecDeque<f64>,
    last_output: Option<BBResult>,
}

impl BollingerBands {
    pub fn new(period: usize, std_dev: f64) -> Result<Self> {
        if period < 2 {
            anyhow::bail!("invalid Bollinger period {}: need at least 2", period);
        }
        Ok(Self {
            period,
            std_dev,
            window: VecDeque::with_capacity(period + 1),
            last_output: None,
        })
    }

    /// Get middle band (SMA)
    pub fn middle(&self) -> Option<f64> {
        self.last_output.as_ref().map(|o| o.middle)
    }

    pub fn output(&self) -> Option<BBResult> {
        self.last_output.clone()
    }

    fn compute(&self) -> Option<BBResult> {
        if self.window.len() < self.period {
            return None;
        }
        let n = self.period as f64;
        let mean = self.window.iter().sum::<f64>() / n;
        let variance = self.window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let width = self.std_dev * variance.sqrt();
        Some(BBResult {
            upper: mean + width,
            middle: mean,
            lower: mean - width,
        })
    }
}

impl Indicator for BollingerBands {
    fn name(&self) -> &str {
        "BollingerBands"
    }

    fn update(&mut self, value: f64) {
        self.window.push_back(value);
        if self.window.len() > self.period {
            self.window.pop_front();
        }
        self.last_output = self.compute();
    }

    fn value(&self) -> Option<f64> {
        self.middle()
    }

    fn is_ready(&self) -> bool {
        self.window.len() >= self.period
    }
}

/// Bollinger Bands result structure
#[derive(Debug, Clone, PartialEq)]
pub struct BBResult {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Bands at every position of `values`
pub fn bollinger_series(values: &[f64], period: usize, std_dev: f64) -> Result<Vec<Option<BBResult>>> {
    let mut bands = BollingerBands::new(period, std_dev)?;
    Ok(values
        .iter()
        .map(|&v| {
            bands.update(v);
            bands.output()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_sample_standard_deviation() {
        let bands = bollinger_series(&[1.0, 2.0, 3.0, 4.0], 4, 2.0).unwrap();
        assert!(bands[2].is_none());
        let last = bands[3].clone().unwrap();
        // mean 2.5, sample variance 5/3
        let sd = (5.0_f64 / 3.0).sqrt();
        assert!((last.middle - 2.5).abs() < 1e-12);
        assert!((last.upper - (2.5 + 2.0 * sd)).abs() < 1e-12);
        assert!((last.lower - (2.5 - 2.0 * sd)).abs() < 1e-12);
    }
}
