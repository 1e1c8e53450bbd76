use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar fetched from the exchange, oldest-first within a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A candle plus the indicator columns computed over the history up to it.
///
/// Numeric indicators are `None` until enough bars have accumulated for
/// them to be defined (the warm-up period). Pattern flags follow the talib
/// convention: 0 = absent, ±100 = pattern detected on this bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedCandle {
    pub candle: Candle,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_middle: Option<f64>,
    pub bollinger_lower: Option<f64>,
    /// +100 when the bar is a doji.
    pub doji: i64,
    /// +100 when a three-bar morning doji star completes on this bar.
    pub morning_doji_star: i64,
    /// Rolling average of volume over the configured window.
    pub volume_avg: Option<f64>,
}

impl EnrichedCandle {
    /// A row with every indicator column undefined, as produced during warm-up.
    pub fn bare(candle: Candle) -> Self {
        Self {
            candle,
            rsi: None,
            macd: None,
            macd_signal: None,
            macd_hist: None,
            bollinger_upper: None,
            bollinger_middle: None,
            bollinger_lower: None,
            doji: 0,
            morning_doji_star: 0,
            volume_avg: None,
        }
    }
}

/// Indicator configuration resolved per symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_window: usize,
    pub bollinger_std: f64,
    pub volume_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 7,
            macd_fast: 8,
            macd_slow: 17,
            macd_signal: 9,
            bollinger_window: 14,
            bollinger_std: 1.5,
            volume_window: 20,
        }
    }
}

impl IndicatorParams {
    /// Bars after which the MACD signal line must be defined.
    pub fn macd_warmup(&self) -> usize {
        self.macd_slow + self.macd_signal
    }

    /// Bars after which every indicator column is defined.
    pub fn max_warmup(&self) -> usize {
        (self.rsi_period + 1)
            .max(self.macd_warmup())
            .max(self.bollinger_window)
            .max(self.volume_window)
    }
}

/// Direction of a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// A signal produced by evaluating the latest enriched row.
///
/// Constructed fresh each analysis cycle and consumed immediately by the
/// notification step; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub side: Side,
    pub price: f64,
    /// Snapshot of the row that triggered the signal.
    pub row: EnrichedCandle,
}

impl Signal {
    /// Name of the candle pattern that participated in the rule.
    pub fn pattern_name(&self) -> &'static str {
        match self.side {
            Side::Buy => "Doji",
            Side::Sell => "Morning Doji Star",
        }
    }
}
