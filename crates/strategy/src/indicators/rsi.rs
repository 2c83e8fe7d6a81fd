use crate::error::{Result, StrategyError};

/// RSI (Relative Strength Index) indicator.
///
/// Uses Wilder's smoothed moving average (same as TradingView / standard RSI).
/// Values are undefined until at least `period + 1` closed prices are available.
#[derive(Debug, Clone)]
pub struct RsiIndicator {
    pub period: usize,
}

impl RsiIndicator {
    pub const DEFAULT_PERIOD: usize = 14;

    pub fn new(period: usize) -> Result<Self> {
        if period < 2 {
            return Err(StrategyError::Indicator(format!(
                "RSI period must be >= 2, got {period}"
            )));
        }
        Ok(Self { period })
    }

    /// RSI for every position of `closes` (oldest first). The first `period`
    /// positions are NaN.
    pub fn series(&self, closes: &[f64]) -> Vec<f64> {
        let mut out = vec![f64::NAN; closes.len()];
        if closes.len() < self.period + 1 {
            return out;
        }

        // First average gain/loss over the initial `period` changes
        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
        let initial = &changes[..self.period];

        let mut avg_gain = initial.iter().filter(|&&c| c > 0.0).sum::<f64>() / self.period as f64;
        let mut avg_loss = initial.iter().filter(|&&c| c < 0.0).map(|c| c.abs()).sum::<f64>()
            / self.period as f64;
        out[self.period] = rsi_from(avg_gain, avg_loss);

        // Wilder smoothing over remaining changes
        for (i, &change) in changes.iter().enumerate().skip(self.period) {
            let gain = if change > 0.0 { change } else { 0.0 };
            let loss = if change < 0.0 { change.abs() } else { 0.0 };
            avg_gain = (avg_gain * (self.period - 1) as f64 + gain) / self.period as f64;
            avg_loss = (avg_loss * (self.period - 1) as f64 + loss) / self.period as f64;
            // changes[i] ends at closes[i + 1]
            out[i + 1] = rsi_from(avg_gain, avg_loss);
        }
        out
    }

}

fn rsi_from(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [f64; 15] = [
        44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.15, 43.61, 44.33, 44.83, 45.10,
        45.15, 44.34, 44.09,
    ];

    fn last(rsi: &RsiIndicator, prices: &[f64]) -> f64 {
        *rsi.series(prices).last().unwrap()
    }

    #[test]
    fn rsi_rejects_short_period() {
        assert!(RsiIndicator::new(1).is_err());
        assert!(RsiIndicator::new(2).is_ok());
    }

    #[test]
    fn rsi_is_nan_when_insufficient_data() {
        let rsi = RsiIndicator::new(14).unwrap();
        // Need at least period+1 = 15 values
        let prices = vec![100.0; 14];
        assert!(rsi.series(&prices).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_first_value_at_period() {
        let rsi = RsiIndicator::new(14).unwrap();
        // 15 values, exactly period+1
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let series = rsi.series(&prices);
        assert!(series[13].is_nan());
        assert!(series[14].is_finite());
    }

    #[test]
    fn rsi_series_is_nan_until_period() {
        let rsi = RsiIndicator::new(3).unwrap();
        let series = rsi.series(&[10.0, 11.0, 10.5, 12.0, 11.0, 13.0]);
        assert_eq!(series.len(), 6);
        assert!(series[..3].iter().all(|v| v.is_nan()));
        assert!(series[3..].iter().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn rsi_all_gains_returns_100() {
        let rsi = RsiIndicator::new(3).unwrap();
        // Strictly increasing prices → RSI = 100
        let value = last(&rsi, &[10.0, 11.0, 12.0, 13.0, 14.0]);
        assert!((value - 100.0).abs() < 1e-6, "Expected ~100, got {value}");
    }

    #[test]
    fn rsi_all_losses_returns_0() {
        let rsi = RsiIndicator::new(3).unwrap();
        // Strictly decreasing prices → RSI = 0
        let value = last(&rsi, &[14.0, 13.0, 12.0, 11.0, 10.0]);
        assert!((value - 0.0).abs() < 1e-6, "Expected ~0, got {value}");
    }

    #[test]
    fn rsi_known_value() {
        let rsi = RsiIndicator::new(14).unwrap();
        // Gains sum to 3.14 and losses to 3.39 over the first 14 changes.
        let first = last(&rsi, &SAMPLE);
        assert!((first - 100.0 * 3.14 / 6.53).abs() < 1e-9, "got {first}");

        // One more close of 44.83 goes through a Wilder smoothing step.
        let mut prices = SAMPLE.to_vec();
        prices.push(44.83);
        let smoothed = last(&rsi, &prices);
        assert!((smoothed - 53.732_283_464_566_9).abs() < 1e-9, "got {smoothed}");
    }
}
