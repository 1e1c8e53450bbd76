/// Simple rolling mean, `None` until the window fills. Used for the
/// rolling volume average the signal rule compares against.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    if window == 0 || n < window {
        return out;
    }

    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);
    for i in window..n {
        sum += values[i] - values[i - window];
        out[i] = Some(sum / window as f64);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_before_window_fills() {
        let out = rolling_mean(&[1.0, 2.0, 3.0], 20);
        assert!(out.iter().all(|v| v.is_none()));
    }

    #[test]
    fn sliding_window_average() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert!((out[2].unwrap() - 2.0).abs() < 1e-9);
        assert!((out[3].unwrap() - 3.0).abs() < 1e-9);
        assert!((out[4].unwrap() - 4.0).abs() < 1e-9);
    }
}
