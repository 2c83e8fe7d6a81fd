use crate::indicators::moving::{rolling_mean, rolling_std};

/// Bollinger band output, NaN until `window` values are available.
#[derive(Debug, Clone, Default)]
pub struct BollingerBands {
    pub lower: Vec<f64>,
    pub mid: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Rolling mean ± `stds` rolling sample standard deviations.
pub fn bollinger_bands(values: &[f64], window: usize, stds: f64) -> BollingerBands {
    let mid = rolling_mean(values, window);
    let sd = rolling_std(values, window);
    let lower = mid.iter().zip(&sd).map(|(m, s)| m - stds * s).collect();
    let upper = mid.iter().zip(&sd).map(|(m, s)| m + stds * s).collect();
    BollingerBands { lower, mid, upper }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_series_collapses_bands() {
        let bands = bollinger_bands(&[5.0; 25], 20, 2.0);
        assert!(bands.mid[18].is_nan());
        assert_eq!(bands.lower[19], 5.0);
        assert_eq!(bands.mid[19], 5.0);
        assert_eq!(bands.upper[24], 5.0);
    }

    #[test]
    fn mid_is_rolling_mean_and_bands_are_symmetric() {
        let values: Vec<f64> = (0..30).map(|i| (i as f64 * 0.7).sin() * 10.0 + 50.0).collect();
        let bands = bollinger_bands(&values, 20, 2.0);
        let mean = rolling_mean(&values, 20);
        for i in 19..30 {
            assert_eq!(bands.mid[i], mean[i]);
            let up = bands.upper[i] - bands.mid[i];
            let down = bands.mid[i] - bands.lower[i];
            assert!(up > 0.0 && (up - down).abs() < 1e-9);
        }
    }
}
