use crate::{Candle, EnrichedCandle, IndicatorParams};

/// Computes indicator columns over a candle history.
///
/// Implementations must be pure: same input series and params, same output,
/// one enriched row per input candle. `TaEngine` in `crates/indicators` is
/// the production implementation; analysis tests substitute deterministic
/// stubs.
pub trait IndicatorEngine: Send + Sync {
    fn enrich(&self, candles: &[Candle], params: &IndicatorParams) -> Vec<EnrichedCandle>;
}
