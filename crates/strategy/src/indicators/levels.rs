use common::Candle;

use crate::error::{Result, StrategyError};
use crate::indicators::moving::rolling_mean;

/// Classic floor-trader pivot levels, one value per candle.
///
/// ```text
/// pivot = mean(typical price)          over `timeperiod` candles
/// r1    = 2·pivot − mean(low)
/// s1    = 2·pivot − mean(high)
/// rN    = (pivot − s(N−1)) + r(N−1)
/// sN    = pivot − (r(N−1) − s(N−1))
/// ```
#[derive(Debug, Clone, Default)]
pub struct PivotLevels {
    pub pivot: Vec<f64>,
    /// `resistances[0]` is r1.
    pub resistances: Vec<Vec<f64>>,
    /// `supports[0]` is s1.
    pub supports: Vec<Vec<f64>>,
}

pub const DEFAULT_LEVEL_PERIOD: usize = 2;
pub const DEFAULT_LEVELS: usize = 3;

pub fn pivot_levels(candles: &[Candle], timeperiod: usize, levels: usize) -> Result<PivotLevels> {
    if timeperiod == 0 || levels == 0 {
        return Err(StrategyError::Indicator(format!(
            "pivot levels need timeperiod > 0 and levels > 0, got {timeperiod}/{levels}"
        )));
    }

    let typical: Vec<f64> = candles.iter().map(Candle::typical_price).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();

    let pivot = rolling_mean(&typical, timeperiod);
    let low = rolling_mean(&lows, timeperiod);
    let high = rolling_mean(&highs, timeperiod);

    let r1: Vec<f64> = pivot.iter().zip(&low).map(|(p, l)| 2.0 * p - l).collect();
    let s1: Vec<f64> = pivot.iter().zip(&high).map(|(p, h)| 2.0 * p - h).collect();
    let mut resistances = vec![r1];
    let mut supports = vec![s1];

    for _ in 1..levels {
        let (prev_r, prev_s) = (&resistances[resistances.len() - 1], &supports[supports.len() - 1]);
        let r: Vec<f64> = (0..pivot.len())
            .map(|i| (pivot[i] - prev_s[i]) + prev_r[i])
            .collect();
        let s: Vec<f64> = (0..pivot.len())
            .map(|i| pivot[i] - (prev_r[i] - prev_s[i]))
            .collect();
        resistances.push(r);
        supports.push(s);
    }

    Ok(PivotLevels { pivot, resistances, supports })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn candle(i: i64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::hours(i),
            open: close,
            high,
            low,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn single_period_levels_match_textbook_formula() {
        let candles = [candle(0, 12.0, 6.0, 9.0)];
        let levels = pivot_levels(&candles, 1, 2).unwrap();
        // pivot 9, r1 = 18 - 6, s1 = 18 - 12, r2 = (9 - 6) + 12, s2 = 9 - (12 - 6)
        assert_eq!(levels.pivot, vec![9.0]);
        assert_eq!(levels.resistances[0], vec![12.0]);
        assert_eq!(levels.supports[0], vec![6.0]);
        assert_eq!(levels.resistances[1], vec![15.0]);
        assert_eq!(levels.supports[1], vec![3.0]);
    }

    #[test]
    fn levels_are_ordered_and_lead_with_nan() {
        let candles: Vec<Candle> = (0..10)
            .map(|i| {
                let base = 100.0 + i as f64;
                candle(i, base + 2.0, base - 2.0, base)
            })
            .collect();
        let levels = pivot_levels(&candles, DEFAULT_LEVEL_PERIOD, DEFAULT_LEVELS).unwrap();
        assert_eq!(levels.resistances.len(), 3);
        assert!(levels.pivot[0].is_nan());
        for i in 1..10 {
            assert!(levels.supports[2][i] < levels.supports[1][i]);
            assert!(levels.supports[0][i] < levels.pivot[i]);
            assert!(levels.pivot[i] < levels.resistances[0][i]);
            assert!(levels.resistances[1][i] < levels.resistances[2][i]);
        }
    }

    #[test]
    fn rejects_zero_levels() {
        assert!(pivot_levels(&[], 2, 0).is_err());
    }
}
