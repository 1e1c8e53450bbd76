use chrono::{TimeZone, Utc};
use proptest::option;
use proptest::prelude::*;

use analysis::evaluate;
use common::{Candle, EnrichedCandle, Side};

fn arb_row() -> impl Strategy<Value = EnrichedCandle> {
    (
        option::of(any::<f64>()),
        option::of(any::<f64>()),
        option::of(any::<f64>()),
        any::<i64>(),
        any::<i64>(),
        any::<f64>(),
        option::of(any::<f64>()),
    )
        .prop_map(
            |(rsi, macd, macd_signal, doji, morning_doji_star, volume, volume_avg)| {
                let candle = Candle {
                    open_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    open: 100.0,
                    high: 101.0,
                    low: 99.0,
                    close: 100.5,
                    volume,
                };
                EnrichedCandle {
                    candle,
                    rsi,
                    macd,
                    macd_signal,
                    macd_hist: None,
                    bollinger_upper: None,
                    bollinger_middle: None,
                    bollinger_lower: None,
                    doji,
                    morning_doji_star,
                    volume_avg,
                }
            },
        )
}

proptest! {
    /// The decision rule must never panic, whatever the row carries —
    /// including NaN and infinities in any numeric column.
    #[test]
    fn never_panics_and_signals_imply_their_conjunction(row in arb_row(), price in any::<f64>()) {
        match evaluate("TESTUSDT", &row, price) {
            Some(signal) => {
                // A signal can only exist once every required column is defined
                prop_assert!(row.rsi.is_some());
                prop_assert!(row.macd.is_some());
                prop_assert!(row.macd_signal.is_some());
                prop_assert!(row.volume_avg.is_some());
                prop_assert!(row.candle.volume > row.volume_avg.unwrap());
                match signal.side {
                    Side::Buy => {
                        prop_assert!(row.rsi.unwrap() < 30.0);
                        prop_assert!(row.macd.unwrap() > row.macd_signal.unwrap());
                        prop_assert!(row.doji != 0);
                    }
                    Side::Sell => {
                        prop_assert!(row.rsi.unwrap() > 70.0);
                        prop_assert!(row.macd.unwrap() < row.macd_signal.unwrap());
                        prop_assert!(row.morning_doji_star != 0);
                    }
                }
            }
            None => {}
        }
    }

    /// Warm-up rows (any required column undefined) evaluate to no signal.
    #[test]
    fn undefined_columns_short_circuit(mut row in arb_row(), price in any::<f64>()) {
        row.macd_signal = None;
        prop_assert!(evaluate("TESTUSDT", &row, price).is_none());
    }
}
