use async_trait::async_trait;

/// Outbound notification channel for signal and error alerts.
///
/// Delivery is best-effort: implementations log failures instead of
/// propagating them, so a broken notifier can never kill an analysis task.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str);
}
