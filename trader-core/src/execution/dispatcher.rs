//! Action dispatcher
//!
//! Interprets one decision into exchange calls:
//!
//! | decision         | path                                               |
//! |------------------|----------------------------------------------------|
//! | order            | validate -> send                                   |
//! | cancel           | cancel                                             |
//! | cancel_and_order | cancel -> settle delay -> validate -> send         |
//! | hold / none      | no exchange call                                   |
//!
//! Rejected orders are logged and dropped. Exchange failures are logged and
//! returned; the dispatcher never retries.

use crate::config::TradingConfig;
use crate::decision::Decision;
use crate::exchange::{Exchange, OrderAck, OrderRequest, OrderTicket};
use crate::execution::{OrderValidation, OrderValidator, RejectReason};
use crate::Result;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Whether exchange calls are really made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Live,
    /// Validate and sequence as usual, log instead of calling the exchange
    DryRun,
}

/// Dispatcher states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    ValidateOrder,
    ValidateCancel,
    Cancel,
    Settling,
    Dispatched,
    NoOp,
}

/// What happened to an order request
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    Placed(OrderAck),
    /// Dry-run: the ticket that would have been sent
    Simulated(OrderTicket),
    Rejected(RejectReason),
}

/// Result of dispatching one decision
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Order(OrderOutcome),
    Cancelled { order_id: String },
    CancelAndOrder { cancelled: String, order: OrderOutcome },
    NoOp,
}

/// Action dispatcher
pub struct ActionDispatcher {
    exchange: Arc<dyn Exchange>,
    validator: OrderValidator,
    settle_delay: Duration,
    mode: DispatchMode,
    state: DispatchState,
}

impl ActionDispatcher {
    pub fn new(
        exchange: Arc<dyn Exchange>,
        validator: OrderValidator,
        settle_delay: Duration,
        mode: DispatchMode,
    ) -> Self {
        Self {
            exchange,
            validator,
            settle_delay,
            mode,
            state: DispatchState::Idle,
        }
    }

    pub fn from_config(exchange: Arc<dyn Exchange>, config: &TradingConfig, mode: DispatchMode) -> Self {
        Self::new(exchange, OrderValidator::from_config(config), config.settle_delay(), mode)
    }

    /// State reached by the last dispatch
    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    fn transition(&mut self, next: DispatchState) {
        debug!("Dispatcher {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Carry out a decision
    pub async fn dispatch(&mut self, decision: &Decision) -> Result<DispatchOutcome> {
        self.state = DispatchState::Idle;

        let outcome = match decision {
            Decision::Order(request) => {
                let outcome = self.place(request).await?;
                DispatchOutcome::Order(outcome)
            }
            Decision::Cancel { order_id } => {
                if !self.validate_cancel(order_id) {
                    return Ok(DispatchOutcome::NoOp);
                }
                self.cancel(order_id).await?;
                self.transition(DispatchState::Dispatched);
                DispatchOutcome::Cancelled {
                    order_id: order_id.clone(),
                }
            }
            Decision::CancelAndOrder { order_id, order } => {
                // no replacement order without a cancel
                if !self.validate_cancel(order_id) {
                    return Ok(DispatchOutcome::NoOp);
                }
                self.cancel(order_id).await?;
                // the exchange may refuse an order overlapping one it is still cancelling
                self.transition(DispatchState::Settling);
                tokio::time::sleep(self.settle_delay).await;
                let outcome = self.place(order).await?;
                DispatchOutcome::CancelAndOrder {
                    cancelled: order_id.clone(),
                    order: outcome,
                }
            }
            Decision::Hold => {
                info!("[hold] Holding position");
                self.transition(DispatchState::NoOp);
                DispatchOutcome::NoOp
            }
            Decision::None => {
                info!("[hold] No decision returned");
                self.transition(DispatchState::NoOp);
                DispatchOutcome::NoOp
            }
        };

        Ok(outcome)
    }

    fn validate_cancel(&mut self, order_id: &str) -> bool {
        self.transition(DispatchState::ValidateCancel);
        if order_id.trim().is_empty() {
            warn!("[cancel] Not sent: empty order id");
            self.transition(DispatchState::NoOp);
            return false;
        }
        true
    }

    async fn place(&mut self, request: &OrderRequest) -> Result<OrderOutcome> {
        self.transition(DispatchState::ValidateOrder);
        info!(
            "[order] side: {:?} / price: {:?} / size: {} / order_type: {:?} / time_in_force: {:?}",
            request.side, request.price, request.size, request.order_type, request.time_in_force
        );

        let ticket = match self.validator.validate(request) {
            OrderValidation::Accepted(ticket) => ticket,
            OrderValidation::Rejected(reason) => {
                warn!("[order] Not sent: {}", reason);
                self.transition(DispatchState::NoOp);
                return Ok(OrderOutcome::Rejected(reason));
            }
        };

        if self.mode == DispatchMode::DryRun {
            info!("[dry-run] Would send order: {:?}", ticket);
            self.transition(DispatchState::Dispatched);
            return Ok(OrderOutcome::Simulated(ticket));
        }

        match self.exchange.send_order(&ticket).await {
            Ok(ack) => {
                info!("[order] Accepted: {}", ack.order_id);
                self.transition(DispatchState::Dispatched);
                Ok(OrderOutcome::Placed(ack))
            }
            Err(e) => {
                error!("[order] Failed to send {:?}: {:#}", ticket, e);
                Err(e).with_context(|| format!("send order {:?} {} @ {:?}", ticket.side, ticket.size, ticket.price))
            }
        }
    }

    async fn cancel(&mut self, order_id: &str) -> Result<()> {
        self.transition(DispatchState::Cancel);
        info!("[cancel] Cancel order: {}", order_id);

        if self.mode == DispatchMode::DryRun {
            info!("[dry-run] Would cancel order: {}", order_id);
            return Ok(());
        }

        self.exchange.cancel_order(order_id).await.map_err(|e| {
            error!("[cancel] Failed to cancel {}: {:#}", order_id, e);
            e.context(format!("cancel order {}", order_id))
        })
    }
}
