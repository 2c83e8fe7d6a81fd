use crate::error::{Result, StrategyError};
use crate::indicators::moving::ema_series;

/// MACD (Moving Average Convergence/Divergence) indicator.
///
/// Computes: MACD line = EMA(fast) − EMA(slow), Signal = EMA(macd_line, signal_period).
#[derive(Debug, Clone)]
pub struct MacdIndicator {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// Full-length MACD output, NaN where undefined.
#[derive(Debug, Clone, Default)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl Default for MacdIndicator {
    fn default() -> Self {
        Self { fast: 12, slow: 26, signal: 9 }
    }
}

impl MacdIndicator {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self> {
        if fast == 0 || signal == 0 || fast >= slow {
            return Err(StrategyError::Indicator(format!(
                "MACD needs 0 < fast < slow and signal > 0, got {fast}/{slow}/{signal}"
            )));
        }
        Ok(Self { fast, slow, signal })
    }

    /// MACD, signal and histogram for every position of `closes`.
    /// The signal line is defined from index `slow + signal - 2`.
    pub fn series(&self, closes: &[f64]) -> MacdSeries {
        let fast = ema_series(closes, self.fast);
        let slow = ema_series(closes, self.slow);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_series(&macd, self.signal);
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();
        MacdSeries { macd, signal, histogram }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::cross::{crossed_above, crossed_below};

    fn trending_up(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    #[test]
    fn macd_rejects_fast_not_below_slow() {
        assert!(MacdIndicator::new(26, 12, 9).is_err());
        assert!(MacdIndicator::new(12, 12, 9).is_err());
    }

    #[test]
    fn macd_is_nan_with_insufficient_data() {
        let macd = MacdIndicator::default();
        let out = macd.series(&[100.0; 30]); // signal needs >= 34
        assert_eq!(out.signal.len(), 30);
        assert!(out.signal.iter().all(|v| v.is_nan()));
        assert!(out.macd[25].is_finite());
    }

    #[test]
    fn macd_series_defined_from_expected_index() {
        let macd = MacdIndicator::new(3, 6, 3).unwrap();
        let out = macd.series(&trending_up(20));
        assert!(out.macd[4].is_nan() && out.macd[5].is_finite());
        // slow + signal - 2 = 7
        assert!(out.signal[6].is_nan() && out.signal[7].is_finite());
        assert!(out.histogram[7].is_finite());
    }

    #[test]
    fn macd_detects_bullish_crossover() {
        let macd = MacdIndicator::new(3, 6, 3).unwrap();
        // Accelerating slide keeps MACD under its signal, then a sharp reversal
        let mut prices: Vec<f64> = (0..30).map(|i| 100.0 - 0.1 * (i * i) as f64).collect();
        prices.push(120.0);
        let out = macd.series(&prices);
        let last = prices.len() - 1;
        assert!(crossed_above(&out.macd, &out.signal)[last]);
        assert!(!crossed_above(&out.macd, &out.signal)[..last].contains(&true));
    }

    #[test]
    fn macd_detects_bearish_crossover() {
        let macd = MacdIndicator::new(3, 6, 3).unwrap();
        let mut prices: Vec<f64> = (0..30).map(|i| 100.0 + 0.1 * (i * i) as f64).collect();
        prices.push(50.0);
        let out = macd.series(&prices);
        let last = prices.len() - 1;
        assert!(crossed_below(&out.macd, &out.signal)[last]);
        assert!(!crossed_below(&out.macd, &out.signal)[..last].contains(&true));
    }

    #[test]
    fn macd_never_crosses_on_steady_acceleration() {
        let macd = MacdIndicator::new(3, 6, 3).unwrap();
        // MACD keeps rising on an accelerating trend and never meets its signal
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + 0.1 * (i * i) as f64).collect();
        let out = macd.series(&prices);
        assert!(!crossed_above(&out.macd, &out.signal).contains(&true));
        assert!(!crossed_below(&out.macd, &out.signal).contains(&true));
    }

    #[test]
    fn macd_of_linear_trend_is_constant() {
        let macd = MacdIndicator::new(3, 6, 3).unwrap();
        let out = macd.series(&trending_up(40));
        // Lag difference between EMA(3) and EMA(6) on slope 0.5: (5 - 2) / 2 * 0.5
        assert!(out.macd[10..].iter().all(|v| (v - 0.75).abs() < 1e-9));
    }
}
