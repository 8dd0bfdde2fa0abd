//! Scripted collaborators for the trading pipeline tests

#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;
use trader_core::prelude::*;

/// Exchange call as observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BoardState,
    Ticker,
    Balances,
    OpenOrders,
    Executions(usize),
    SendOrder(OrderTicket),
    Cancel(String),
}

/// Exchange whose readiness check follows a script of successes (`true`)
/// and failures (`false`). Once the script runs out every check succeeds.
pub struct MockExchange {
    calls: Mutex<Vec<(Instant, Call)>>,
    board_script: Mutex<VecDeque<bool>>,
    state: Mutex<MarketState>,
    fail_orders: bool,
}

impl MockExchange {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            board_script: Mutex::new(VecDeque::new()),
            state: Mutex::new(MarketState::Running),
            fail_orders: false,
        }
    }

    pub fn with_board_script(self, script: &[bool]) -> Self {
        *self.board_script.lock().unwrap() = script.iter().copied().collect();
        self
    }

    pub fn with_state(self, state: MarketState) -> Self {
        *self.state.lock().unwrap() = state;
        self
    }

    pub fn failing_orders(mut self) -> Self {
        self.fail_orders = true;
        self
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((Instant::now(), call));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn timed_calls(&self) -> Vec<(Instant, Call)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn sent_orders(&self) -> Vec<OrderTicket> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SendOrder(ticket) => Some(ticket),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Exchange for MockExchange {
    async fn board_state(&self) -> Result<BoardState> {
        self.record(Call::BoardState);
        let ok = self.board_script.lock().unwrap().pop_front().unwrap_or(true);
        if !ok {
            return Err(anyhow!("simulated transport failure"));
        }
        Ok(BoardState {
            state: *self.state.lock().unwrap(),
            health: Some("NORMAL".to_string()),
        })
    }

    async fn ticker(&self) -> Result<Ticker> {
        self.record(Call::Ticker);
        Ok(Ticker {
            product_code: "BTC_JPY".to_string(),
            ltp: 10_000_000.0,
            best_bid: 9_999_000.0,
            best_ask: 10_001_000.0,
            volume: 1234.5,
            volume_by_product: 1000.0,
        })
    }

    async fn balances(&self) -> Result<Vec<Balance>> {
        self.record(Call::Balances);
        Ok(vec![
            Balance {
                currency: "JPY".to_string(),
                amount: 1_000_000.0,
                available: 1_000_000.0,
            },
            Balance {
                currency: "BTC".to_string(),
                amount: 0.1,
                available: 0.1,
            },
            Balance {
                currency: "ETH".to_string(),
                amount: 2.0,
                available: 2.0,
            },
        ])
    }

    async fn open_orders(&self) -> Result<Vec<OpenOrder>> {
        self.record(Call::OpenOrders);
        Ok(Vec::new())
    }

    async fn executions(&self, count: usize) -> Result<Vec<Execution>> {
        self.record(Call::Executions(count));
        Ok(Vec::new())
    }

    async fn send_order(&self, ticket: &OrderTicket) -> Result<OrderAck> {
        self.record(Call::SendOrder(ticket.clone()));
        if self.fail_orders {
            return Err(anyhow!("simulated order rejection"));
        }
        Ok(OrderAck {
            order_id: format!("JRF-{}", self.count(|c| matches!(c, Call::SendOrder(_)))),
        })
    }

    async fn cancel_order(&self, order_id: &str) -> Result<()> {
        self.record(Call::Cancel(order_id.to_string()));
        Ok(())
    }
}

/// Decision authority answering every request the same way
pub struct FixedAuthority {
    decision: Decision,
    requests: Mutex<Vec<DecisionRequest>>,
}

impl FixedAuthority {
    pub fn new(decision: Decision) -> Self {
        Self {
            decision,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<DecisionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DecisionAuthority for FixedAuthority {
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.decision.clone())
    }
}

/// Decision authority that bids one tick below the current best bid
pub struct BidBelowAuthority;

#[async_trait]
impl DecisionAuthority for BidBelowAuthority {
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision> {
        Ok(Decision::Order(OrderRequest {
            side: OrderSide::Buy,
            price: Some(request.ticker.best_bid - 1.0),
            size: 0.001,
            order_type: OrderType::Limit,
            time_in_force: None,
        }))
    }
}

/// Bar source replaying a fixed history
pub struct FixedBars(pub Vec<Snapshot>);

#[async_trait]
impl BarSource for FixedBars {
    async fn fetch_snapshots(&self) -> Result<Vec<Snapshot>> {
        Ok(self.0.clone())
    }
}

/// Five-minute bar snapshots with the given closes
pub fn bar_snapshots(closes: &[f64]) -> Vec<Snapshot> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Snapshot::bar(
                base + Duration::minutes(5 * i as i64),
                close,
                close + 1.0,
                close - 1.0,
                close,
                10.0,
            )
        })
        .collect()
}

pub fn limit_buy(price: f64, size: f64) -> OrderRequest {
    OrderRequest {
        side: OrderSide::Buy,
        price: Some(price),
        size,
        order_type: OrderType::Limit,
        time_in_force: None,
    }
}

/// Trading config writing its snapshot file under `dir`
pub fn test_config(dir: &std::path::Path) -> TradingConfig {
    TradingConfig {
        snapshot_file: dir.join("price_cache.json"),
        signal_source: SignalSource::Snapshots,
        ..TradingConfig::default()
    }
}
