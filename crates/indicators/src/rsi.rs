/// RSI (Relative Strength Index) over close prices.
///
/// Uses Wilder's smoothed moving average (same as TradingView / standard RSI).
/// The output is aligned to the input: `out[i]` is the RSI at bar `i`, `None`
/// for the first `period` bars where it is undefined.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period < 1 || closes.len() < period + 1 {
        return out;
    }

    // Seed with the simple average gain/loss over the first `period` changes
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss += -change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    // Wilder smoothing over the remaining changes
    for i in period + 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };
        avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn undefined_below_warmup() {
        let prices = vec![100.0; 14];
        let out = rsi(&prices, 14);
        assert!(out.iter().all(|v| v.is_none()));
    }

    #[test]
    fn defined_from_period_onward() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&prices, 14);
        assert!(out[..14].iter().all(|v| v.is_none()));
        assert!(out[14..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn all_gains_returns_100() {
        let prices = vec![10.0, 11.0, 12.0, 13.0, 14.0];
        let value = rsi(&prices, 3).last().copied().flatten().unwrap();
        assert!((value - 100.0).abs() < 1e-6, "Expected ~100, got {value}");
    }

    #[test]
    fn all_losses_returns_0() {
        let prices = vec![14.0, 13.0, 12.0, 11.0, 10.0];
        let value = rsi(&prices, 3).last().copied().flatten().unwrap();
        assert!((value - 0.0).abs() < 1e-6, "Expected ~0, got {value}");
    }

    proptest! {
        /// RSI must stay in [0, 100] for arbitrary positive price series.
        #[test]
        fn stays_in_range(prices in proptest::collection::vec(0.0001f64..1_000_000.0, 2..80)) {
            for v in rsi(&prices, 7).into_iter().flatten() {
                prop_assert!((0.0..=100.0).contains(&v), "RSI out of range: {v}");
            }
        }
    }
}
