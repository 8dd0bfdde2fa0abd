//! OHLCV bars and fixed-interval resampling

use crate::data::Snapshot;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV aggregate over one fixed time bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bucket start
    pub timestamp: DateTime<Utc>,
    /// Opening price (first observation)
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Closing price (last observation)
    pub close: f64,
    /// Summed volume
    pub volume: f64,
}

impl Bar {
    fn start(bucket: DateTime<Utc>, snapshot: &Snapshot) -> Self {
        Self {
            timestamp: bucket,
            open: snapshot.open(),
            high: snapshot.high(),
            low: snapshot.low(),
            close: snapshot.close(),
            volume: snapshot.volume,
        }
    }

    fn absorb(&mut self, snapshot: &Snapshot) {
        self.high = self.high.max(snapshot.high());
        self.low = self.low.min(snapshot.low());
        self.close = snapshot.close();
        self.volume += snapshot.volume;
    }
}

/// Start of the bucket containing `timestamp`
pub fn bucket_start(timestamp: DateTime<Utc>, interval: Duration) -> Option<DateTime<Utc>> {
    let width = interval.num_seconds();
    if width <= 0 {
        return None;
    }
    let start = timestamp.timestamp().div_euclid(width) * width;
    DateTime::from_timestamp(start, 0)
}

/// Group snapshots into fixed-width buckets keyed by bucket start.
///
/// Input order does not matter. Output is time-ascending with one bar per
/// bucket that holds at least one snapshot; empty buckets are skipped.
pub fn resample(snapshots: &[Snapshot], interval: Duration) -> Vec<Bar> {
    let mut ordered: Vec<&Snapshot> = snapshots.iter().collect();
    ordered.sort_by_key(|s| s.timestamp);

    let mut bars: Vec<Bar> = Vec::new();
    for snapshot in ordered {
        let Some(bucket) = bucket_start(snapshot.timestamp, interval) else {
            return Vec::new();
        };
        match bars.last_mut() {
            Some(bar) if bar.timestamp == bucket => bar.absorb(snapshot),
            _ => bars.push(Bar::start(bucket, snapshot)),
        }
    }
    bars
}

/// Close prices of a bar series
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
