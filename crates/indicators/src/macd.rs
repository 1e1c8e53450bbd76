/// MACD (Moving Average Convergence/Divergence) series.
///
/// MACD line = EMA(fast) − EMA(slow); signal = EMA of the MACD line over
/// `signal_period`; histogram = MACD − signal. Each output is aligned to
/// the input closes and `None` until its own warm-up completes: the MACD
/// line from bar `slow − 1`, the signal line from bar
/// `slow + signal_period − 2`.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub hist: Vec<Option<f64>>,
}

pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    let n = closes.len();
    let ema_fast = ema(closes, fast);
    let ema_slow = ema(closes, slow);

    let macd_line: Vec<Option<f64>> = (0..n)
        .map(|i| match (ema_fast[i], ema_slow[i]) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    // The signal line is an EMA over the defined portion of the MACD line.
    let defined: Vec<f64> = macd_line.iter().flatten().copied().collect();
    let offset = n - defined.len();
    let signal_defined = ema(&defined, signal_period);

    let mut signal = vec![None; n];
    for (i, v) in signal_defined.into_iter().enumerate() {
        signal[offset + i] = v;
    }

    let hist: Vec<Option<f64>> = (0..n)
        .map(|i| match (macd_line[i], signal[i]) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    MacdSeries {
        macd: macd_line,
        signal,
        hist,
    }
}

/// Exponential moving average, seeded with the SMA of the first `period`
/// values. `None` until `period` values have been seen.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut current = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(current);

    for i in period..values.len() {
        current = values[i] * k + current * (1.0 - k);
        out[i] = Some(current);
    }

    out
}
