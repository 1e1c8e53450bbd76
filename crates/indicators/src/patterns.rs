use common::Candle;

/// Body must be within this fraction of the bar's range to count as a doji.
const DOJI_BODY_RATIO: f64 = 0.1;

/// Fraction of its range the first candle's body must cover to count as a
/// decisive bearish bar in the morning doji star.
const LONG_BODY_RATIO: f64 = 0.5;

fn body(c: &Candle) -> f64 {
    (c.close - c.open).abs()
}

fn range(c: &Candle) -> f64 {
    c.high - c.low
}

fn is_doji(c: &Candle) -> bool {
    let r = range(c);
    r > 0.0 && body(c) <= r * DOJI_BODY_RATIO
}

/// Single-bar doji: open and close nearly equal relative to the bar's range.
/// +100 on matching bars, 0 otherwise.
pub fn doji(candles: &[Candle]) -> Vec<i64> {
    candles
        .iter()
        .map(|c| if is_doji(c) { 100 } else { 0 })
        .collect()
}

/// Three-bar morning doji star, flagged on the completing (third) bar:
/// a decisive bearish candle, a doji whose body gaps below it, then a
/// bullish candle closing above the midpoint of the first body. +100 on
/// the completing bar, 0 otherwise (including the first two bars of any
/// series, where the pattern cannot be formed yet).
pub fn morning_doji_star(candles: &[Candle]) -> Vec<i64> {
    (0..candles.len())
        .map(|i| {
            if i < 2 {
                return 0;
            }
            let first = &candles[i - 2];
            let star = &candles[i - 1];
            let third = &candles[i];

            let first_bearish =
                first.close < first.open && body(first) >= range(first) * LONG_BODY_RATIO;
            let star_gaps_down = is_doji(star) && star.open.max(star.close) < first.close;
            let third_bullish =
                third.close > third.open && third.close > (first.open + first.close) / 2.0;

            if first_bearish && star_gaps_down && third_bullish {
                100
            } else {
                0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            open_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            open,
            high,
            low,
            close,
            volume: 100.0,
        }
    }

    #[test]
    fn flags_a_doji() {
        let bars = vec![candle(100.0, 105.0, 95.0, 100.2)];
        assert_eq!(doji(&bars), vec![100]);
    }

    #[test]
    fn wide_body_is_not_a_doji() {
        let bars = vec![candle(100.0, 110.0, 99.0, 109.0)];
        assert_eq!(doji(&bars), vec![0]);
    }

    #[test]
    fn zero_range_bar_is_not_a_doji() {
        let bars = vec![candle(100.0, 100.0, 100.0, 100.0)];
        assert_eq!(doji(&bars), vec![0]);
    }

    #[test]
    fn detects_morning_doji_star() {
        let bars = vec![
            candle(110.0, 111.0, 99.0, 100.0), // long bearish body
            candle(97.0, 98.5, 95.5, 97.2),    // doji gapping below
            candle(98.0, 109.0, 97.5, 108.0),  // bullish close into first body
        ];
        assert_eq!(morning_doji_star(&bars), vec![0, 0, 100]);
    }

    #[test]
    fn no_star_without_gap() {
        let bars = vec![
            candle(110.0, 111.0, 99.0, 100.0),
            candle(104.0, 106.0, 102.0, 104.3), // doji but inside the first body
            candle(98.0, 109.0, 97.5, 108.0),
        ];
        assert_eq!(morning_doji_star(&bars), vec![0, 0, 0]);
    }

    #[test]
    fn first_two_bars_are_zero() {
        let bars = vec![
            candle(100.0, 101.0, 99.0, 100.1),
            candle(100.0, 101.0, 99.0, 100.1),
        ];
        assert_eq!(morning_doji_star(&bars), vec![0, 0]);
    }
}
