//! Control loop
//!
//! Every observe tick checks the market state and records a ticker
//! snapshot. Once the decide interval has elapsed since the last decision,
//! the same tick also computes signals, asks the decision authority and
//! dispatches the result. A failed cycle bumps the error counter; reaching
//! the maximum stops the loop.

use crate::config::TradingConfig;
use crate::data::{BarSource, Snapshot, SnapshotStore};
use crate::decision::{Decision, DecisionAuthority, DecisionRequest};
use crate::error::CycleError;
use crate::exchange::{Exchange, MarketState};
use crate::execution::{ActionDispatcher, DispatchMode, DispatchOutcome};
use crate::portfolio::normalize_balances;
use crate::runner::ErrorCounter;
use crate::signals::{SignalEngine, SignalRow};
use crate::Result;
use chrono::Utc;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// What a completed cycle did
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Market not running, nothing else attempted
    Skipped(MarketState),
    /// Snapshot recorded; no decision due yet
    Observed,
    /// A decision was obtained and carried out
    Decided {
        decision: Decision,
        outcome: DispatchOutcome,
    },
}

/// Whether the loop keeps going after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Halt,
}

/// Trading loop
pub struct TradingLoop {
    config: TradingConfig,
    exchange: Arc<dyn Exchange>,
    authority: Arc<dyn DecisionAuthority>,
    bar_source: Option<Arc<dyn BarSource>>,
    store: SnapshotStore,
    signals: SignalEngine,
    dispatcher: ActionDispatcher,
    errors: ErrorCounter,
    last_decision: Option<Instant>,
}

impl TradingLoop {
    pub fn new(
        config: TradingConfig,
        exchange: Arc<dyn Exchange>,
        authority: Arc<dyn DecisionAuthority>,
        mode: DispatchMode,
    ) -> Result<Self> {
        let store = SnapshotStore::open(config.snapshot_file.clone(), config.snapshot_capacity);
        let signals = SignalEngine::from_config(&config)?;
        let dispatcher = ActionDispatcher::from_config(exchange.clone(), &config, mode);
        let errors = ErrorCounter::new(config.max_consecutive_errors);

        Ok(Self {
            config,
            exchange,
            authority,
            bar_source: None,
            store,
            signals,
            dispatcher,
            errors,
            last_decision: None,
        })
    }

    /// Compute signals from this source instead of the snapshot store
    pub fn with_bar_source(mut self, source: Arc<dyn BarSource>) -> Self {
        self.bar_source = Some(source);
        self
    }

    pub fn config(&self) -> &TradingConfig {
        &self.config
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn error_count(&self) -> u32 {
        self.errors.count()
    }

    /// Run until the error counter is exhausted
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Trading loop started: {} (observe every {}s, decide every {}s, mode {:?})",
            self.config.product_code,
            self.config.observe_interval_secs,
            self.config.decide_interval_secs,
            self.dispatcher.mode()
        );

        loop {
            if self.tick().await == LoopControl::Halt {
                anyhow::bail!(
                    "trading loop halted after {} consecutive failed cycles",
                    self.errors.count()
                );
            }
            tokio::time::sleep(self.config.observe_interval()).await;
        }
    }

    /// One observe tick with error accounting
    pub async fn tick(&mut self) -> LoopControl {
        match self.run_cycle(false).await {
            Ok(outcome) => {
                debug!("Cycle completed: {:?}", outcome);
                self.errors.reset();
                LoopControl::Continue
            }
            Err(e) => {
                let count = self.errors.record_failure();
                error!("Cycle failed ({}/{}): {}", count, self.errors.max(), e);
                if self.errors.exhausted() {
                    error!("Too many consecutive failures, stopping");
                    LoopControl::Halt
                } else {
                    LoopControl::Continue
                }
            }
        }
    }

    /// One cycle with the decision forced regardless of cadence.
    ///
    /// Does not touch the error counter.
    pub async fn run_once(&mut self) -> std::result::Result<CycleOutcome, CycleError> {
        self.run_cycle(true).await
    }

    /// Signal rows for the current history, without deciding
    pub async fn current_signals(&mut self) -> Result<Vec<SignalRow>> {
        let history = self.history().await?;
        self.signals.get_signals(&history)
    }

    fn decision_due(&self) -> bool {
        match self.last_decision {
            Some(at) => at.elapsed() >= self.config.decide_interval(),
            None => true,
        }
    }

    async fn history(&self) -> Result<Vec<Snapshot>> {
        match &self.bar_source {
            Some(source) => source.fetch_snapshots().await,
            None => Ok(self.store.chronological()),
        }
    }

    async fn run_cycle(&mut self, force_decision: bool) -> std::result::Result<CycleOutcome, CycleError> {
        let board = self.exchange.board_state().await.map_err(CycleError::Readiness)?;
        if !board.is_ready() {
            info!("Market is {:?} (health {:?}), skipping cycle", board.state, board.health);
            return Ok(CycleOutcome::Skipped(board.state));
        }

        let ticker = self.exchange.ticker().await.map_err(CycleError::MarketData)?;
        let snapshot = Snapshot::tick(Utc::now(), ticker.ltp, ticker.best_bid, ticker.best_ask, ticker.volume);
        if let Err(e) = self.store.append(snapshot) {
            warn!("Failed to persist snapshot: {}", e);
        }

        if !force_decision && !self.decision_due() {
            return Ok(CycleOutcome::Observed);
        }

        let history = self.history().await.map_err(CycleError::MarketData)?;
        let signals = self.signals.get_signals(&history).map_err(CycleError::Signals)?;
        if signals.is_empty() {
            warn!(
                "No complete signal rows yet ({} snapshots, {} needed)",
                history.len(),
                self.config.indicators.warmup_bars()
            );
        }

        let balances = self.exchange.balances().await.map_err(CycleError::MarketData)?;
        let open_orders = self.exchange.open_orders().await.map_err(CycleError::MarketData)?;
        let executions = self
            .exchange
            .executions(self.config.execution_count)
            .await
            .map_err(CycleError::MarketData)?;

        let balances = match self.config.currencies() {
            Some((base, quote)) => normalize_balances(&balances, &base, &quote, self.config.balance_haircut),
            None => balances,
        };

        let request = DecisionRequest {
            signals,
            ticker,
            balances,
            open_orders,
            executions,
            requested_at: Utc::now(),
        };

        let decision = self.authority.decide(&request).await.map_err(CycleError::Decision)?;
        info!("Decision: {}", decision.kind());

        let outcome = if decision.is_actionable() {
            self.dispatcher.dispatch(&decision).await.map_err(CycleError::Dispatch)?
        } else {
            DispatchOutcome::NoOp
        };
        self.last_decision = Some(Instant::now());

        Ok(CycleOutcome::Decided { decision, outcome })
    }
}
