//! Signal rows handed to the decision authority

use crate::data::Bar;
use serde::{Serialize, Serializer};

/// Moving-average crossover direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Short MA above long MA (+1)
    Up,
    /// Short MA at or below long MA (-1)
    Down,
}

impl Trend {
    /// Strict comparison: equal averages resolve to `Down`
    pub fn from_averages(short_ma: f64, long_ma: f64) -> Self {
        if short_ma > long_ma {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Trend::Up => 1,
            Trend::Down => -1,
        }
    }
}

impl Serialize for Trend {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

/// One bar with every indicator defined
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalRow {
    #[serde(flatten)]
    pub bar: Bar,
    pub short_ma: f64,
    pub long_ma: f64,
    pub signal: Trend,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub bb_upper: f64,
    pub bb_mid: f64,
    pub bb_lower: f64,
}
