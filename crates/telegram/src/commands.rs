use std::sync::Arc;

use teloxide::{
    dispatching::UpdateHandler,
    prelude::*,
    utils::command::BotCommands,
};
use tracing::{info, warn};

use analysis::{AnalysisController, StartOutcome, StopOutcome};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Dependencies injected into every handler via `dptree`.
#[derive(Clone)]
pub struct BotDeps {
    pub controller: AnalysisController,
    /// The only chat allowed to issue commands (also the alert destination).
    pub chat_id: ChatId,
}

/// Telegram bot commands exposed to the operator.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "SigWatch commands:")]
pub enum Command {
    #[command(description = "Greet the operator")]
    Start,
    #[command(description = "Start periodic analysis for a symbol, e.g. /beginanalysis BTCUSDT")]
    BeginAnalysis(String),
    #[command(description = "Stop all running analyses")]
    StopAnalysis,
    #[command(description = "Show which symbols are being analyzed")]
    Status,
}

/// Start the Telegram bot in long-polling mode.
pub async fn start_bot(token: String, deps: BotDeps) {
    let bot = Bot::new(token);
    let deps = Arc::new(deps);

    info!("Telegram bot starting (long-polling)");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![deps])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(handle_start))
        .branch(case![Command::BeginAnalysis(symbol)].endpoint(handle_begin_analysis))
        .branch(case![Command::StopAnalysis].endpoint(handle_stop_analysis))
        .branch(case![Command::Status].endpoint(handle_status));

    Update::filter_message()
        .filter(auth_filter)
        .branch(command_handler)
}

/// Silently drop messages from any chat other than the configured one.
fn auth_filter(msg: Message, deps: Arc<BotDeps>) -> bool {
    let allowed = msg.chat.id == deps.chat_id;
    if !allowed {
        warn!(chat_id = msg.chat.id.0, "Ignoring message from unauthorized chat");
    }
    allowed
}

async fn handle_start(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "Welcome to the market analysis bot!")
        .await?;
    Ok(())
}

async fn handle_begin_analysis(
    bot: Bot,
    msg: Message,
    symbol: String,
    deps: Arc<BotDeps>,
) -> HandlerResult {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        bot.send_message(msg.chat.id, "Usage: /beginanalysis <symbol>")
            .await?;
        return Ok(());
    }

    let reply = match deps.controller.start(&symbol).await {
        StartOutcome::Started => format!("Analysis started for {symbol}."),
        StartOutcome::AlreadyRunning => format!("Analysis for {symbol} is already running."),
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn handle_stop_analysis(bot: Bot, msg: Message, deps: Arc<BotDeps>) -> HandlerResult {
    let mut stopped = deps.controller.stop_all().await;
    let reply = if stopped.is_empty() {
        "No analysis is currently running.".to_string()
    } else {
        stopped.sort();
        format!("Analysis stopped for {}.", stopped.join(", "))
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn handle_status(bot: Bot, msg: Message, deps: Arc<BotDeps>) -> HandlerResult {
    let statuses = deps.controller.statuses().await;
    let text = if statuses.is_empty() {
        "No symbols registered. Use /beginanalysis <symbol> to start.".to_string()
    } else {
        let lines: Vec<String> = statuses
            .into_iter()
            .map(|(symbol, active)| {
                let state = if active { "running" } else { "idle" };
                format!("{symbol}: {state}")
            })
            .collect();
        format!("SigWatch status\n{}", lines.join("\n"))
    };
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}
