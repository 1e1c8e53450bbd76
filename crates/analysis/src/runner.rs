use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use common::{Error, IndicatorEngine, IndicatorParams, MarketData, Notifier, Result};

use crate::controller::AnalysisSettings;
use crate::evaluator::{evaluate, signal_message};

/// Scheduler state of one symbol's analysis task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Parked: the controller flag is off; poll it every idle interval.
    Idle,
    /// Actively fetching and evaluating on the cycle interval.
    Running,
    /// A cycle failed; wait out the backoff before fetching again.
    Backoff,
}

/// Events that drive [`LoopState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    FlagSet,
    FlagCleared,
    CycleCompleted,
    /// The cycle was abandoned (computation defect) but the schedule keeps
    /// its normal pace.
    CycleSkipped,
    CycleFailed,
    BackoffElapsed,
}

impl LoopState {
    /// Pure transition table. A cleared flag always parks the loop; every
    /// other trigger only applies to the state that produces it.
    pub fn next(self, trigger: Trigger) -> LoopState {
        use LoopState::*;
        use Trigger::*;
        match (self, trigger) {
            (_, FlagCleared) => Idle,
            (Idle, FlagSet) => Running,
            (Running, CycleCompleted | CycleSkipped) => Running,
            (Running, CycleFailed) => Backoff,
            (Backoff, BackoffElapsed) => Running,
            (state, _) => state,
        }
    }
}

/// Per-symbol analysis task: fetch klines, enrich, evaluate the latest row,
/// notify on a signal, pace itself, and survive every per-cycle failure.
///
/// Runs until the controller aborts it; clearing the active flag only parks
/// it in [`LoopState::Idle`].
pub struct AnalysisLoop {
    symbol: String,
    params: IndicatorParams,
    settings: AnalysisSettings,
    market: Arc<dyn MarketData>,
    engine: Arc<dyn IndicatorEngine>,
    notifier: Arc<dyn Notifier>,
    active: Arc<AtomicBool>,
    state: LoopState,
}

impl AnalysisLoop {
    pub fn new(
        symbol: String,
        params: IndicatorParams,
        settings: AnalysisSettings,
        market: Arc<dyn MarketData>,
        engine: Arc<dyn IndicatorEngine>,
        notifier: Arc<dyn Notifier>,
        active: Arc<AtomicBool>,
    ) -> Self {
        Self {
            symbol,
            params,
            settings,
            market,
            engine,
            notifier,
            active,
            state: LoopState::Idle,
        }
    }

    /// Run forever. Call from `tokio::spawn`; the controller holds the
    /// `JoinHandle` and aborts it on shutdown.
    pub async fn run(mut self) {
        info!(symbol = %self.symbol, "Analysis loop started");

        loop {
            self.state = match self.state {
                LoopState::Idle => {
                    if self.active.load(Ordering::SeqCst) {
                        info!(symbol = %self.symbol, "Analysis active");
                        self.state.next(Trigger::FlagSet)
                    } else {
                        sleep(self.settings.idle_poll).await;
                        self.state
                    }
                }

                LoopState::Running => {
                    if !self.active.load(Ordering::SeqCst) {
                        info!(symbol = %self.symbol, "Analysis parked");
                        self.state.next(Trigger::FlagCleared)
                    } else {
                        let trigger = self.run_cycle_guarded().await;
                        self.state.next(trigger)
                    }
                }

                LoopState::Backoff => {
                    sleep(self.settings.error_backoff).await;
                    self.state.next(Trigger::BackoffElapsed)
                }
            };
        }
    }

    /// Run one cycle, classify any failure, alert, and pace the schedule.
    /// Never lets an error escape to the task boundary.
    async fn run_cycle_guarded(&self) -> Trigger {
        match self.run_cycle().await {
            Ok(()) => {
                sleep(self.settings.cycle_interval).await;
                Trigger::CycleCompleted
            }
            Err(e @ Error::Computation(_)) => {
                warn!(symbol = %self.symbol, error = %e, "Cycle skipped");
                self.alert(&e).await;
                sleep(self.settings.cycle_interval).await;
                Trigger::CycleSkipped
            }
            Err(e) => {
                warn!(
                    symbol = %self.symbol,
                    error = %e,
                    backoff = ?self.settings.error_backoff,
                    "Cycle failed, backing off"
                );
                self.alert(&e).await;
                Trigger::CycleFailed
            }
        }
    }

    async fn run_cycle(&self) -> Result<()> {
        debug!(symbol = %self.symbol, "Starting analysis cycle");

        let candles = self
            .market
            .klines(
                &self.symbol,
                &self.settings.kline_interval,
                self.settings.kline_limit,
            )
            .await?;

        let rows = self.engine.enrich(&candles, &self.params);
        let Some(row) = rows.last() else {
            return Err(Error::DataSource(format!(
                "empty kline history for {}",
                self.symbol
            )));
        };

        // A missing signal column past warm-up means the indicator pipeline
        // is defective, not that the market is quiet.
        if candles.len() >= self.params.macd_warmup() && row.macd_signal.is_none() {
            return Err(Error::Computation(format!(
                "MACD signal column missing for {} after {} bars",
                self.symbol,
                candles.len()
            )));
        }

        let price = self.market.current_price(&self.symbol).await?;

        match evaluate(&self.symbol, row, price) {
            Some(signal) => {
                info!(symbol = %self.symbol, side = %signal.side, price, "Signal detected");
                self.notifier.send(&signal_message(&signal)).await;
            }
            None => {
                debug!(symbol = %self.symbol, "No signal this cycle");
            }
        }

        Ok(())
    }

    async fn alert(&self, error: &Error) {
        self.notifier
            .send(&format!("⚠️ Analysis error for {}: {error}", self.symbol))
            .await;
    }
}
