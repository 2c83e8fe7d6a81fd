use crate::indicators::moving::ema_series;

pub const DEFAULT_TEMA_PERIOD: usize = 9;

/// Triple exponential moving average: `3·EMA1 − 3·EMA2 + EMA3`.
///
/// EMA2 is the EMA of EMA1 and EMA3 the EMA of EMA2, so the first defined
/// value sits at `3 * (period - 1)`.
pub fn tema(values: &[f64], period: usize) -> Vec<f64> {
    let ema1 = ema_series(values, period);
    let ema2 = ema_series(&ema1, period);
    let ema3 = ema_series(&ema2, period);
    ema1.iter()
        .zip(&ema2)
        .zip(&ema3)
        .map(|((e1, e2), e3)| 3.0 * e1 - 3.0 * e2 + e3)
        .collect()
}
