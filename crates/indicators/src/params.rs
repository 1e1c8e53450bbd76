use std::collections::HashMap;

use serde::Deserialize;
use tracing::info;

use common::IndicatorParams;

/// Per-symbol indicator parameters, with optional overrides from a TOML file.
///
/// Example `config/indicators.toml`:
/// ```toml
/// [default]
/// rsi_period = 7
/// bollinger_std = 1.5
///
/// [symbol.ETHUSDT]
/// rsi_period = 14
/// macd_fast = 12
/// macd_slow = 26
/// ```
/// A missing file means built-in defaults for every symbol; a file that
/// exists but does not parse is a startup error.
#[derive(Debug, Clone, Default)]
pub struct ParamsTable {
    default: HashMap<String, toml::Value>,
    per_symbol: HashMap<String, HashMap<String, toml::Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct ParamsFile {
    #[serde(default)]
    default: HashMap<String, toml::Value>,
    #[serde(default)]
    symbol: HashMap<String, HashMap<String, toml::Value>>,
}

impl ParamsTable {
    /// Load from a TOML file. A missing file yields built-in defaults;
    /// a malformed file exits the process.
    pub fn load(path: &str) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                info!(path = %path, "No indicator config file; using built-in defaults");
                return Self::default();
            }
        };
        let file: ParamsFile = toml::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse indicator config at '{path}': {e}"));

        info!(path = %path, symbols = file.symbol.len(), "Loaded indicator config");
        Self {
            default: file.default,
            per_symbol: file.symbol,
        }
    }

    /// Resolve the parameter set for one symbol. Pure: symbol overrides,
    /// then file defaults, then built-in constants.
    pub fn params_for(&self, symbol: &str) -> IndicatorParams {
        let overrides = self.per_symbol.get(symbol).unwrap_or(&self.default);
        let base = IndicatorParams::default();
        IndicatorParams {
            rsi_period: param_usize(overrides, "rsi_period", base.rsi_period),
            macd_fast: param_usize(overrides, "macd_fast", base.macd_fast),
            macd_slow: param_usize(overrides, "macd_slow", base.macd_slow),
            macd_signal: param_usize(overrides, "macd_signal", base.macd_signal),
            bollinger_window: param_usize(overrides, "bollinger_window", base.bollinger_window),
            bollinger_std: param_f64(overrides, "bollinger_std", base.bollinger_std),
            volume_window: param_usize(overrides, "volume_window", base.volume_window),
        }
    }
}

fn param_f64(params: &HashMap<String, toml::Value>, key: &str, default: f64) -> f64 {
    params.get(key).and_then(|v| v.as_float()).unwrap_or(default)
}

fn param_usize(params: &HashMap<String, toml::Value>, key: &str, default: usize) -> usize {
    params
        .get(key)
        .and_then(|v| v.as_integer())
        .map(|v| v as usize)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_yields_builtin_defaults() {
        let table = ParamsTable::default();
        assert_eq!(table.params_for("BTCUSDT"), IndicatorParams::default());
    }

    #[test]
    fn symbol_overrides_win_over_defaults() {
        let file: ParamsFile = toml::from_str(
            r#"
            [default]
            rsi_period = 10

            [symbol.ETHUSDT]
            rsi_period = 14
            bollinger_std = 2.0
            "#,
        )
        .unwrap();
        let table = ParamsTable {
            default: file.default,
            per_symbol: file.symbol,
        };

        let eth = table.params_for("ETHUSDT");
        assert_eq!(eth.rsi_period, 14);
        assert_eq!(eth.bollinger_std, 2.0);
        // Unknown symbol falls back to the [default] section
        let btc = table.params_for("BTCUSDT");
        assert_eq!(btc.rsi_period, 10);
        // And untouched keys keep their built-in values
        assert_eq!(btc.macd_slow, IndicatorParams::default().macd_slow);
    }
}
