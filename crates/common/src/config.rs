/// All configuration loaded from environment variables at startup.
/// Missing required variables cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    // Exchange credentials
    pub binance_api_key: String,
    pub binance_secret: String,

    // Telegram
    pub telegram_token: String,
    /// Chat that receives alerts and is allowed to issue commands.
    pub telegram_chat_id: i64,

    // Analysis pacing
    pub analysis_interval_secs: u64,
    pub error_backoff_secs: u64,
    pub idle_poll_secs: u64,

    // Market data fetch shape
    pub kline_interval: String,
    pub kline_limit: usize,

    // Indicator parameter file path
    pub indicator_config_path: String,

    // Snapshot of active symbols
    pub snapshot_path: String,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Panics on any missing required variable.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let telegram_chat_id = required_env("TELEGRAM_CHAT_ID")
            .trim()
            .parse::<i64>()
            .unwrap_or_else(|_| panic!("TELEGRAM_CHAT_ID must be a numeric chat id"));

        Config {
            binance_api_key: required_env("BINANCE_API_KEY"),
            binance_secret: required_env("BINANCE_SECRET"),
            telegram_token: required_env("TELEGRAM_TOKEN"),
            telegram_chat_id,
            analysis_interval_secs: optional_env("ANALYSIS_INTERVAL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            error_backoff_secs: optional_env("ERROR_BACKOFF_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            idle_poll_secs: optional_env("IDLE_POLL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            kline_interval: optional_env("KLINE_INTERVAL").unwrap_or_else(|| "1h".to_string()),
            kline_limit: optional_env("KLINE_LIMIT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            indicator_config_path: optional_env("INDICATOR_CONFIG_PATH")
                .unwrap_or_else(|| "config/indicators.toml".to_string()),
            snapshot_path: optional_env("SNAPSHOT_PATH")
                .unwrap_or_else(|| "sigwatch-state.json".to_string()),
        }
    }
}

fn required_env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        panic!("Required environment variable '{key}' is not set. Check your .env file.")
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
