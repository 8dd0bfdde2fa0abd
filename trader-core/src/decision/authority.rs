//! Decision authority contract

use crate::decision::Decision;
use crate::exchange::{Balance, Execution, OpenOrder, Ticker};
use crate::signals::SignalRow;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything the decision authority sees for one decision
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRequest {
    pub signals: Vec<SignalRow>,
    pub ticker: Ticker,
    pub balances: Vec<Balance>,
    pub open_orders: Vec<OpenOrder>,
    pub executions: Vec<Execution>,
    pub requested_at: DateTime<Utc>,
}

/// External service choosing the next action
#[async_trait]
pub trait DecisionAuthority: Send + Sync {
    /// Blocking request for a decision; `Decision::None` when nothing is
    /// actionable
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision>;
}
