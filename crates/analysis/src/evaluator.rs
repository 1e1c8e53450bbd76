use common::{EnrichedCandle, Side, Signal};

/// RSI below this is oversold; a buy requires it.
const RSI_OVERSOLD: f64 = 30.0;
/// RSI above this is overbought; a sell requires it.
const RSI_OVERBOUGHT: f64 = 70.0;

/// Apply the fixed decision rule to the latest enriched row.
///
/// Stateless and deterministic: no hysteresis, nothing carried between
/// calls. Any required column still in warm-up makes the whole evaluation
/// return `None` — an expected condition, not an error. Buy is checked
/// first, so it wins if both directions could ever match at once. At most
/// one signal per call.
pub fn evaluate(symbol: &str, row: &EnrichedCandle, price: f64) -> Option<Signal> {
    let rsi = row.rsi?;
    let macd = row.macd?;
    let macd_signal = row.macd_signal?;
    let volume_avg = row.volume_avg?;
    let volume = row.candle.volume;

    if rsi < RSI_OVERSOLD && macd > macd_signal && row.doji != 0 && volume > volume_avg {
        return Some(Signal {
            symbol: symbol.to_string(),
            side: Side::Buy,
            price,
            row: row.clone(),
        });
    }

    if rsi > RSI_OVERBOUGHT && macd < macd_signal && row.morning_doji_star != 0 && volume > volume_avg
    {
        return Some(Signal {
            symbol: symbol.to_string(),
            side: Side::Sell,
            price,
            row: row.clone(),
        });
    }

    None
}

/// Render a signal as the notification text sent to the operator chat.
pub fn signal_message(signal: &Signal) -> String {
    let row = &signal.row;
    format!(
        "🔔 {side} signal for {symbol}:\n\
         Price: {price}\n\
         RSI: {rsi}\n\
         MACD: {macd} | Signal: {macd_signal}\n\
         Bollinger Bands: {bb_upper} | {bb_middle} | {bb_lower}\n\
         Candle pattern: {pattern}\n\
         Volume: {volume:.2} (above average {window:.2})",
        side = signal.side,
        symbol = signal.symbol,
        price = signal.price,
        rsi = fmt_opt(row.rsi),
        macd = fmt_opt(row.macd),
        macd_signal = fmt_opt(row.macd_signal),
        bb_upper = fmt_opt(row.bollinger_upper),
        bb_middle = fmt_opt(row.bollinger_middle),
        bb_lower = fmt_opt(row.bollinger_lower),
        pattern = signal.pattern_name(),
        volume = row.candle.volume,
        window = row.volume_avg.unwrap_or(0.0),
    )
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "n/a".to_string(),
    }
}
