//! Data management module
//!
//! Market snapshots, their persisted rolling store, and bar resampling.

pub mod bar;
pub mod snapshot;
pub mod store;

pub use bar::*;
pub use snapshot::*;
pub use store::*;

use crate::Result;
use async_trait::async_trait;

/// Independent source of price history for the signal engine
#[async_trait]
pub trait BarSource: Send + Sync {
    /// Fetch a time-ascending history of bar snapshots
    async fn fetch_snapshots(&self) -> Result<Vec<Snapshot>>;
}
