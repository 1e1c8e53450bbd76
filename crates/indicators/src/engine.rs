use common::{Candle, EnrichedCandle, IndicatorEngine, IndicatorParams};

use crate::{bollinger, macd, patterns, rsi, volume};

/// Production indicator pipeline: computes every configured indicator
/// column over the candle history in one pass per indicator.
pub struct TaEngine;

impl IndicatorEngine for TaEngine {
    fn enrich(&self, candles: &[Candle], params: &IndicatorParams) -> Vec<EnrichedCandle> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();

        let rsi = rsi::rsi(&closes, params.rsi_period);
        let macd = macd::macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal);
        let bands = bollinger::bollinger(&closes, params.bollinger_window, params.bollinger_std);
        let doji = patterns::doji(candles);
        let star = patterns::morning_doji_star(candles);
        let volume_avg = volume::rolling_mean(&volumes, params.volume_window);

        candles
            .iter()
            .enumerate()
            .map(|(i, &candle)| EnrichedCandle {
                candle,
                rsi: rsi[i],
                macd: macd.macd[i],
                macd_signal: macd.signal[i],
                macd_hist: macd.hist[i],
                bollinger_upper: bands.upper[i],
                bollinger_middle: bands.middle[i],
                bollinger_lower: bands.lower[i],
                doji: doji[i],
                morning_doji_star: star[i],
                volume_avg: volume_avg[i],
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::candles_from_closes;

    #[test]
    fn output_aligns_with_input() {
        let candles = candles_from_closes(&(0..50).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let rows = TaEngine.enrich(&candles, &IndicatorParams::default());
        assert_eq!(rows.len(), candles.len());
        assert_eq!(rows[10].candle, candles[10]);
    }

    #[test]
    fn tiny_series_has_every_numeric_column_undefined() {
        let params = IndicatorParams::default();
        // Shorter than every individual warm-up window
        let closes: Vec<f64> = (0..params.rsi_period).map(|i| 100.0 + i as f64).collect();
        let candles = candles_from_closes(&closes);
        let rows = TaEngine.enrich(&candles, &params);

        assert_eq!(rows.len(), candles.len());
        for row in &rows {
            assert!(row.rsi.is_none());
            assert!(row.macd.is_none());
            assert!(row.macd_signal.is_none());
            assert!(row.macd_hist.is_none());
            assert!(row.bollinger_upper.is_none());
            assert!(row.bollinger_middle.is_none());
            assert!(row.bollinger_lower.is_none());
            assert!(row.volume_avg.is_none());
        }
    }

    #[test]
    fn macd_signal_still_undefined_just_below_largest_warmup() {
        let params = IndicatorParams::default();
        let closes: Vec<f64> = (0..params.macd_warmup() - 2)
            .map(|i| 100.0 + (i as f64).sin())
            .collect();
        let candles = candles_from_closes(&closes);
        let rows = TaEngine.enrich(&candles, &params);
        assert!(rows.last().unwrap().macd_signal.is_none());
    }

    #[test]
    fn empty_series_yields_no_rows() {
        let rows = TaEngine.enrich(&[], &IndicatorParams::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn long_series_has_all_columns_defined_at_the_end() {
        let params = IndicatorParams::default();
        let closes: Vec<f64> = (0..params.max_warmup() * 3)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0)
            .collect();
        let candles = candles_from_closes(&closes);
        let rows = TaEngine.enrich(&candles, &params);

        let last = rows.last().unwrap();
        assert!(last.rsi.is_some());
        assert!(last.macd.is_some());
        assert!(last.macd_signal.is_some());
        assert!(last.macd_hist.is_some());
        assert!(last.bollinger_upper.is_some());
        assert!(last.bollinger_middle.is_some());
        assert!(last.bollinger_lower.is_some());
        assert!(last.volume_avg.is_some());
    }
}
