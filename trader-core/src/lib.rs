//! Trader-Core: signal-driven trading loop for a single spot product
//!
//! # Features
//!
//! - **Data**: rolling persisted snapshot store and fixed-interval bar resampling
//! - **Indicators**: SMA, EMA, RSI, MACD, Bollinger Bands
//! - **Signals**: multi-indicator rows for the decision authority
//! - **Decisions**: typed actions decoded from the authority's function calls
//! - **Execution**: order validation and a cancel/settle/order dispatcher
//! - **Runner**: two-cadence control loop with fail-stop error accounting
//!
//! The exchange, the decision authority and optional bar sources are
//! consumed through the [`exchange::Exchange`], [`decision::DecisionAuthority`]
//! and [`data::BarSource`] traits.
//!
//! # Example
//!
//! ```no_run
//! use trader_core::prelude::*;
//! use std::sync::Arc;
//!
//! async fn start(exchange: Arc<dyn Exchange>, authority: Arc<dyn DecisionAuthority>) -> Result<()> {
//!     let mut trading = TradingLoop::new(TradingConfig::default(), exchange, authority, DispatchMode::Live)?;
//!     trading.run().await
//! }
//! ```

pub mod config;
pub mod data;
pub mod decision;
pub mod error;
pub mod exchange;
pub mod execution;
pub mod indicators;
pub mod portfolio;
pub mod runner;
pub mod signals;

// Re-export commonly used types
pub mod prelude {
    pub use crate::config::*;
    pub use crate::data::*;
    pub use crate::decision::*;
    pub use crate::error::*;
    pub use crate::exchange::*;
    pub use crate::execution::*;
    pub use crate::indicators::*;
    pub use crate::portfolio::*;
    pub use crate::runner::*;
    pub use crate::signals::*;

    pub use anyhow::{Context, Result};
}

/// Result type alias
pub type Result<T> = anyhow::Result<T>;
