//! EMA (Exponential Moving Average) indicator

use crate::indicators::{run_series, Indicator};
use crate::Result;
use ta::indicators::ExponentialMovingAverage;
use ta::Next;

/// Recursive EMA with smoothing 2/(span+1), seeded with the first value.
/// Defined from the first update onward.
#[derive(Debug)]
pub struct EMA {
    inner: ExponentialMovingAverage,
    last_value: Option<f64>,
}

impl EMA {
    pub fn new(span: usize) -> Result<Self> {
        let inner = ExponentialMovingAverage::new(span)
            .map_err(|e| anyhow::anyhow!("invalid EMA span {}: {:?}", span, e))?;
        Ok(Self {
            inner,
            last_value: None,
        })
    }
}

impl Indicator for EMA {
    fn name(&self) -> &str {
        "EMA"
    }

    fn update(&mut self, value: f64) {
        self.last_value = Some(self.inner.next(value));
    }

    fn value(&self) -> Option<f64> {
        self.last_value
    }

    fn is_ready(&self) -> bool {
        self.last_value.is_some()
    }
}

/// EMA value at every position of `values`
pub fn ema_series(values: &[f64], span: usize) -> Result<Vec<Option<f64>>> {
    Ok(run_series(EMA::new(span)?, values))
}
