/// Bollinger Bands: rolling SMA ± `num_std` population standard deviations
/// (ddof = 0, matching talib / the Python `ta` library).
#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn bollinger(closes: &[f64], window: usize, num_std: f64) -> BollingerSeries {
    let n = closes.len();
    let mut upper = vec![None; n];
    let mut middle = vec![None; n];
    let mut lower = vec![None; n];

    if window == 0 {
        return BollingerSeries { upper, middle, lower };
    }

    for i in (window - 1)..n {
        let slice = &closes[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / window as f64;
        let std = var.sqrt();
        upper[i] = Some(mean + num_std * std);
        middle[i] = Some(mean);
        lower[i] = Some(mean - num_std * std);
    }

    BollingerSeries { upper, middle, lower }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_before_window_fills() {
        let closes = vec![10.0; 5];
        let out = bollinger(&closes, 14, 1.5);
        assert!(out.middle.iter().all(|v| v.is_none()));
    }

    #[test]
    fn constant_series_collapses_bands() {
        let closes = vec![50.0; 20];
        let out = bollinger(&closes, 14, 1.5);
        let i = closes.len() - 1;
        assert_eq!(out.middle[i], Some(50.0));
        assert_eq!(out.upper[i], Some(50.0));
        assert_eq!(out.lower[i], Some(50.0));
    }

    #[test]
    fn bands_bracket_the_mean() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 5) as f64).collect();
        let out = bollinger(&closes, 14, 2.0);
        let i = closes.len() - 1;
        let (u, m, l) = (
            out.upper[i].unwrap(),
            out.middle[i].unwrap(),
            out.lower[i].unwrap(),
        );
        assert!(l < m && m < u, "bands not ordered: {l} {m} {u}");
    }

    #[test]
    fn known_window_values() {
        // Window of 4 over [2, 4, 4, 4, 5, 5, 7, 9]: at index 3
        // mean = 3.5, population std = sqrt(0.75)
        let closes = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let out = bollinger(&closes, 4, 2.0);
        let m = out.middle[3].unwrap();
        let u = out.upper[3].unwrap();
        assert!((m - 3.5).abs() < 1e-9);
        assert!((u - (3.5 + 2.0 * 0.75f64.sqrt())).abs() < 1e-9);
    }
}
