//! Exchange collaborator contract and account models

use crate::exchange::{OrderAck, OrderSide, OrderTicket, OrderType};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trading state of the order book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketState {
    Running,
    Closed,
    Starting,
    Preopen,
    #[serde(rename = "CIRCUIT BREAK")]
    CircuitBreak,
    #[serde(rename = "AWAITING SQ")]
    AwaitingSq,
    Matured,
    #[serde(other)]
    Unknown,
}

/// Board readiness as reported by the exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub state: MarketState,
    #[serde(default)]
    pub health: Option<String>,
}

impl BoardState {
    /// Only a running board accepts decisions
    pub fn is_ready(&self) -> bool {
        self.state == MarketState::Running
    }
}

/// Current ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    #[serde(default)]
    pub product_code: String,
    /// Last traded price
    pub ltp: f64,
    pub best_bid: f64,
    pub best_ask: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub volume_by_product: f64,
}

/// Balance of one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(alias = "currency_code")]
    pub currency: String,
    pub amount: f64,
    pub available: f64,
}

/// Resting order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenOrder {
    /// Id accepted by `cancel_order`
    #[serde(alias = "child_order_acceptance_id")]
    pub order_id: String,
    pub side: OrderSide,
    #[serde(alias = "child_order_type")]
    pub order_type: OrderType,
    #[serde(default)]
    pub price: f64,
    pub size: f64,
    #[serde(default)]
    pub outstanding_size: f64,
    #[serde(default, alias = "child_order_date")]
    pub placed_at: String,
    #[serde(default)]
    pub expire_date: String,
}

/// Own fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: i64,
    pub side: OrderSide,
    pub price: f64,
    pub size: f64,
    pub exec_date: String,
    #[serde(default)]
    pub commission: f64,
}

/// Exchange REST collaborator.
///
/// Any error is a transport/auth/exchange failure and fails the cycle.
#[async_trait]
pub trait Exchange: Send + Sync {
    async fn board_state(&self) -> Result<BoardState>;

    async fn ticker(&self) -> Result<Ticker>;

    async fn balances(&self) -> Result<Vec<Balance>>;

    async fn open_orders(&self) -> Result<Vec<OpenOrder>>;

    /// Most recent `count` own executions
    async fn executions(&self, count: usize) -> Result<Vec<Execution>>;

    async fn send_order(&self, ticket: &OrderTicket) -> Result<OrderAck>;

    async fn cancel_order(&self, order_id: &str) -> Result<()>;
}
