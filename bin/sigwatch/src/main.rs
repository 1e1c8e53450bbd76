use std::sync::Arc;
use std::time::Duration;

use teloxide::types::ChatId;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use analysis::{AnalysisController, AnalysisSettings, LoopDeps};
use common::{Config, IndicatorEngine, IndicatorParams, MarketData, Notifier};
use indicators::{ParamsTable, TaEngine};
use market::BinanceClient;
use store::{Snapshot, SnapshotStore};
use telegram_ctrl::{start_bot, BotDeps, TelegramNotifier};

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!("SigWatch starting");

    // ── Market data ───────────────────────────────────────────────────────────
    let binance = BinanceClient::new(&cfg.binance_api_key, &cfg.binance_secret);
    binance
        .verify_credentials()
        .await
        .unwrap_or_else(|e| panic!("Exchange credential check failed: {e}"));
    info!("Exchange credentials verified");
    let market: Arc<dyn MarketData> = Arc::new(binance);

    // ── Indicator parameters ──────────────────────────────────────────────────
    let params = Arc::new(ParamsTable::load(&cfg.indicator_config_path));

    // ── Notifications ─────────────────────────────────────────────────────────
    let chat_id = ChatId(cfg.telegram_chat_id);
    let bot = teloxide::Bot::new(cfg.telegram_token.clone());
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(bot, chat_id));

    // ── Analysis controller ───────────────────────────────────────────────────
    let settings = AnalysisSettings {
        cycle_interval: Duration::from_secs(cfg.analysis_interval_secs),
        error_backoff: Duration::from_secs(cfg.error_backoff_secs),
        idle_poll: Duration::from_secs(cfg.idle_poll_secs),
        kline_interval: cfg.kline_interval.clone(),
        kline_limit: cfg.kline_limit,
    };
    let engine: Arc<dyn IndicatorEngine> = Arc::new(TaEngine);
    let params_for: Arc<dyn Fn(&str) -> IndicatorParams + Send + Sync> = {
        let params = params.clone();
        Arc::new(move |symbol: &str| params.params_for(symbol))
    };
    let deps = LoopDeps {
        market,
        engine,
        notifier,
        params_for,
    };
    let controller = AnalysisController::new(deps, settings);

    // ── Snapshot restore + persistence hook ───────────────────────────────────
    let snapshots = SnapshotStore::new(&cfg.snapshot_path);
    let restored = match snapshots.load() {
        Ok(snapshot) => snapshot.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Could not read snapshot; starting clean");
            Snapshot::default()
        }
    };
    controller.on_change(move |symbols| {
        let snapshot = Snapshot {
            active_symbols: symbols.to_vec(),
        };
        if let Err(e) = snapshots.save(&snapshot) {
            warn!(error = %e, "Failed to save snapshot");
        }
    });
    for symbol in &restored.active_symbols {
        info!(symbol = %symbol, "Resuming analysis from snapshot");
        controller.start(symbol).await;
    }

    // ── Telegram C2 ───────────────────────────────────────────────────────────
    let bot_deps = BotDeps {
        controller: controller.clone(),
        chat_id,
    };
    tokio::spawn(start_bot(cfg.telegram_token.clone(), bot_deps));

    // Keep main alive until shutdown
    info!("All subsystems started. Waiting for shutdown signal.");
    tokio::signal::ctrl_c().await.unwrap();
    info!("Shutdown signal received. Stopping analysis tasks.");
    controller.shutdown().await;
    info!("Shutdown complete.");
}
