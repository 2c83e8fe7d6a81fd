//! Finite-difference momentum and acceleration of a price series.
//!
//! Unit spacing, second-order accuracy: central stencils inside the series,
//! one-sided second-order stencils on the first and last samples.

/// First derivative. Needs at least 3 samples, otherwise all NaN.
pub fn momentum(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n < 3 {
        return vec![f64::NAN; n];
    }
    let f = values;
    let mut out = vec![0.0; n];
    out[0] = (-3.0 * f[0] + 4.0 * f[1] - f[2]) / 2.0;
    for i in 1..n - 1 {
        out[i] = (f[i + 1] - f[i - 1]) / 2.0;
    }
    out[n - 1] = (3.0 * f[n - 1] - 4.0 * f[n - 2] + f[n - 3]) / 2.0;
    out
}

/// Second derivative. Needs at least 4 samples, otherwise all NaN.
pub fn acceleration(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n < 4 {
        return vec![f64::NAN; n];
    }
    let f = values;
    let mut out = vec![0.0; n];
    out[0] = 2.0 * f[0] - 5.0 * f[1] + 4.0 * f[2] - f[3];
    for i in 1..n - 1 {
        out[i] = f[i - 1] - 2.0 * f[i] + f[i + 1];
    }
    out[n - 1] = 2.0 * f[n - 1] - 5.0 * f[n - 2] + 4.0 * f[n - 3] - f[n - 4];
    out
}

/// Turning points of a momentum series: a minimum where momentum goes from
/// negative to positive, a maximum where it goes from positive to negative.
/// Returns `(minima, maxima)`; position 0 is never flagged.
pub fn differential_pivots(momentum: &[f64]) -> (Vec<bool>, Vec<bool>) {
    let mut minima = vec![false; momentum.len()];
    let mut maxima = vec![false; momentum.len()];
    for (i, w) in momentum.windows(2).enumerate() {
        minima[i + 1] = w[0] < 0.0 && w[1] > 0.0;
        maxima[i + 1] = w[0] > 0.0 && w[1] < 0.0;
    }
    (minima, maxima)
}
