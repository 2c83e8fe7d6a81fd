//! Rolling and exponential averages shared by the other indicators.
//!
//! Every function returns a series as long as its input. Positions whose
//! lookback is incomplete, or whose window touches a NaN, are NaN.

/// Simple rolling mean over `window` values.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Rolling sample standard deviation (n - 1 denominator).
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    if window < 2 {
        return vec![f64::NAN; values.len()];
    }
    rolling(values, window, |w| {
        let n = w.len() as f64;
        let mean = w.iter().sum::<f64>() / n;
        let var = w.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        var.sqrt()
    })
}

fn rolling(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || window > values.len() {
        return out;
    }
    for (i, w) in values.windows(window).enumerate() {
        if w.iter().all(|v| !v.is_nan()) {
            out[i + window - 1] = f(w);
        }
    }
    out
}

/// Exponential moving average with smoothing `2 / (period + 1)`.
///
/// Leading NaNs are skipped; the first value is the SMA of the first
/// `period` valid inputs, so EMAs can be chained (EMA of an EMA).
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 {
        return out;
    }
    let Some(start) = values.iter().position(|v| !v.is_nan()) else {
        return out;
    };
    let seed_end = start + period;
    if seed_end > values.len() {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    // Seed with SMA of first `period` values
    let mut ema_val = values[start..seed_end].iter().sum::<f64>() / period as f64;
    out[seed_end - 1] = ema_val;

    for (i, &price) in values.iter().enumerate().skip(seed_end) {
        ema_val = price * k + ema_val * (1.0 - k);
        out[i] = ema_val;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn rolling_mean_leads_with_nan() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 2);
        assert!(out[0].is_nan());
        assert_eq!(&out[1..], &[1.5, 2.5, 3.5]);
    }

    #[test]
    fn rolling_mean_window_longer_than_series() {
        assert!(rolling_mean(&[1.0, 2.0], 3).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rolling_mean_skips_windows_with_nan() {
        let out = rolling_mean(&[1.0, f64::NAN, 3.0, 5.0], 2);
        assert!(out[1].is_nan() && out[2].is_nan());
        assert_eq!(out[3], 4.0);
    }

    #[test]
    fn rolling_std_is_sample_std() {
        let out = rolling_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8);
        // Population std of this set is 2; sample std is sqrt(32 / 7).
        assert!(approx(out[7], (32.0f64 / 7.0).sqrt()));
    }

    #[test]
    fn ema_seeds_with_sma() {
        let out = ema_series(&[1.0, 2.0, 3.0, 4.0], 3);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert!(approx(out[2], 2.0));
        // k = 0.5
        assert!(approx(out[3], 3.0));
    }

    #[test]
    fn ema_chains_over_leading_nan() {
        let first = ema_series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2);
        let second = ema_series(&first, 2);
        assert!(second[..2].iter().all(|v| v.is_nan()));
        assert!(second[2..].iter().all(|v| v.is_finite()));
    }

    #[test]
    fn ema_of_constant_is_constant() {
        let out = ema_series(&[7.0; 20], 5);
        assert!(out[4..].iter().all(|&v| approx(v, 7.0)));
    }
}
