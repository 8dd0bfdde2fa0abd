//! SMA (Simple Moving Average) indicator

use crate::indicators::{run_series, Indicator};
use crate::Result;
use ta::indicators::SimpleMovingAverage;
use ta::Next;

/// SMA over a trailing window; undefined until the window is full
#[derive(Debug)]
pub struct SMA {
    inner: SimpleMovingAverage,
    period: usize,
    update_count: usize,
    last_value: Option<f64>,
}

impl SMA {
    pub fn new(period: usize) -> Result<Self> {
        let inner = SimpleMovingAverage::new(period)
            .map_err(|e| anyhow::anyhow!("invalid SMA period {}: {:?}", period, e))?;
        Ok(Self {
            inner,
            period,
            update_count: 0,
            last_value: None,
        })
    }
}

impl Indicator for SMA {
    fn name(&self) -> &str {
        "SMA"
    }

    fn update(&mut self, value: f64) {
        let sma_value = self.inner.next(value);
        self.update_count += 1;
        if self.update_count >= self.period {
            self.last_value = Some(sma_value);
        }
    }

    fn value(&self) -> Option<f64> {
        self.last_value
    }

    fn is_ready(&self) -> bool {
        self.update_count >= self.period
    }
}

/// SMA value at every position of `values`
pub fn sma_series(values: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    Ok(run_series(SMA::new(period)?, values))
}
