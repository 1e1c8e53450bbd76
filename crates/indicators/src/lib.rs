pub mod bollinger;
pub mod engine;
pub mod macd;
pub mod params;
pub mod patterns;
pub mod rsi;
pub mod volume;

pub use engine::TaEngine;
pub use params::ParamsTable;

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::{Duration, TimeZone, Utc};
    use common::Candle;

    /// Build an hourly candle series from close prices; open/high/low derived,
    /// constant volume.
    pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Candle {
                    open_time: t0 + Duration::hours(i as i64),
                    open,
                    high: open.max(close) * 1.001,
                    low: open.min(close) * 0.999,
                    close,
                    volume: 100.0,
                }
            })
            .collect()
    }
}
