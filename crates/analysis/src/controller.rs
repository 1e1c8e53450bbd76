use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use common::{IndicatorEngine, IndicatorParams, MarketData, Notifier};

use crate::runner::AnalysisLoop;

/// Pacing and fetch shape shared by every analysis loop.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    /// Sleep between successful cycles.
    pub cycle_interval: Duration,
    /// Sleep after a failed cycle before retrying.
    pub error_backoff: Duration,
    /// How often a parked loop re-checks its active flag.
    pub idle_poll: Duration,
    pub kline_interval: String,
    pub kline_limit: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            cycle_interval: Duration::from_secs(300),
            error_backoff: Duration::from_secs(60),
            idle_poll: Duration::from_secs(10),
            kline_interval: "1h".to_string(),
            kline_limit: 500,
        }
    }
}

/// Collaborators handed to every spawned loop.
#[derive(Clone)]
pub struct LoopDeps {
    pub market: Arc<dyn MarketData>,
    pub engine: Arc<dyn IndicatorEngine>,
    pub notifier: Arc<dyn Notifier>,
    /// Per-symbol parameter resolution, kept as a pure function so the
    /// controller stays decoupled from where parameters come from.
    pub params_for: Arc<dyn Fn(&str) -> IndicatorParams + Send + Sync>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
}

struct AnalysisTask {
    active: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

type ChangeHook = Box<dyn Fn(&[String]) + Send + Sync>;

/// Process-wide registry of per-symbol analysis tasks.
///
/// Cloneable handle over shared state; at most one task per symbol.
/// Stopping clears the task's flag and keeps it parked, so a later start
/// resumes the same task instead of spawning a duplicate.
#[derive(Clone)]
pub struct AnalysisController {
    inner: Arc<Inner>,
}

struct Inner {
    deps: LoopDeps,
    settings: AnalysisSettings,
    tasks: RwLock<HashMap<String, AnalysisTask>>,
    on_change: Mutex<Option<ChangeHook>>,
}

impl AnalysisController {
    pub fn new(deps: LoopDeps, settings: AnalysisSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                deps,
                settings,
                tasks: RwLock::new(HashMap::new()),
                on_change: Mutex::new(None),
            }),
        }
    }

    /// Hook called with the active-symbol list after every start/stop
    /// mutation. Used to persist the set across restarts.
    pub fn on_change<F: Fn(&[String]) + Send + Sync + 'static>(&self, f: F) {
        *self.inner.on_change.lock().unwrap() = Some(Box::new(f));
    }

    /// Start (or resume) analysis for a symbol. Symbols are uppercased so
    /// `btcusdt` and `BTCUSDT` share one task.
    pub async fn start(&self, symbol: &str) -> StartOutcome {
        let symbol = symbol.trim().to_uppercase();
        let mut tasks = self.inner.tasks.write().await;

        let mut respawn = false;
        if let Some(task) = tasks.get(&symbol) {
            if task.handle.is_finished() {
                // A loop task never exits on its own; treat a dead one as
                // gone and respawn below.
                warn!(symbol = %symbol, "Previous analysis task is dead; respawning");
                respawn = true;
            } else if task.active.load(Ordering::SeqCst) {
                return StartOutcome::AlreadyRunning;
            } else {
                task.active.store(true, Ordering::SeqCst);
                info!(symbol = %symbol, "Analysis resumed");
                drop(tasks);
                self.fire_on_change().await;
                return StartOutcome::Started;
            }
        }
        if respawn {
            tasks.remove(&symbol);
        }

        let active = Arc::new(AtomicBool::new(true));
        let params = (self.inner.deps.params_for)(&symbol);
        let analysis = AnalysisLoop::new(
            symbol.clone(),
            params,
            self.inner.settings.clone(),
            self.inner.deps.market.clone(),
            self.inner.deps.engine.clone(),
            self.inner.deps.notifier.clone(),
            active.clone(),
        );
        let handle = tokio::spawn(analysis.run());
        tasks.insert(symbol.clone(), AnalysisTask { active, handle });
        info!(symbol = %symbol, "Analysis started");

        drop(tasks);
        self.fire_on_change().await;
        StartOutcome::Started
    }

    /// Advisory stop: clears the flag; the loop parks within one poll
    /// interval and in-flight work completes first.
    pub async fn stop(&self, symbol: &str) -> StopOutcome {
        let symbol = symbol.trim().to_uppercase();
        let cleared = {
            let tasks = self.inner.tasks.read().await;
            match tasks.get(&symbol) {
                Some(task) => task.active.swap(false, Ordering::SeqCst),
                None => false,
            }
        };

        if cleared {
            info!(symbol = %symbol, "Analysis stopped");
            self.fire_on_change().await;
            StopOutcome::Stopped
        } else {
            StopOutcome::NotRunning
        }
    }

    /// Stop every active symbol; returns the symbols that were running.
    pub async fn stop_all(&self) -> Vec<String> {
        let mut stopped = Vec::new();
        {
            let tasks = self.inner.tasks.read().await;
            for (symbol, task) in tasks.iter() {
                if task.active.swap(false, Ordering::SeqCst) {
                    stopped.push(symbol.clone());
                }
            }
        }

        if !stopped.is_empty() {
            info!(symbols = ?stopped, "Analysis stopped");
            self.fire_on_change().await;
        }
        stopped
    }

    /// Symbols whose analysis is currently active.
    pub async fn active_symbols(&self) -> Vec<String> {
        let tasks = self.inner.tasks.read().await;
        let mut symbols: Vec<String> = tasks
            .iter()
            .filter(|(_, task)| task.active.load(Ordering::SeqCst))
            .map(|(symbol, _)| symbol.clone())
            .collect();
        symbols.sort();
        symbols
    }

    /// Every registered symbol with its active flag, for the status view.
    pub async fn statuses(&self) -> Vec<(String, bool)> {
        let tasks = self.inner.tasks.read().await;
        let mut out: Vec<(String, bool)> = tasks
            .iter()
            .map(|(symbol, task)| (symbol.clone(), task.active.load(Ordering::SeqCst)))
            .collect();
        out.sort();
        out
    }

    /// Hard teardown: abort every retained task and wait for it to finish.
    pub async fn shutdown(&self) {
        let drained: Vec<(String, AnalysisTask)> = {
            let mut tasks = self.inner.tasks.write().await;
            tasks.drain().collect()
        };

        for (symbol, task) in drained {
            task.handle.abort();
            let _ = task.handle.await;
            info!(symbol = %symbol, "Analysis task shut down");
        }
    }

    async fn fire_on_change(&self) {
        let symbols = self.active_symbols().await;
        if let Some(hook) = self.inner.on_change.lock().unwrap().as_ref() {
            hook(&symbols);
        }
    }
}
