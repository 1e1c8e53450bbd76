use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::warn;

use common::Notifier;

/// Sends signal and error alerts to the configured operator chat.
/// Delivery is best-effort: failures are logged and never propagated, so a
/// Telegram outage cannot take an analysis loop down with it.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) {
        if let Err(e) = self.bot.send_message(self.chat_id, text).await {
            warn!(chat_id = self.chat_id.0, error = %e, "Failed to send Telegram message");
        }
    }
}
