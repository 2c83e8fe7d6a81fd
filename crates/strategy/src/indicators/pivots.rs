//! Local extrema ("pivot points") over a price series.
//!
//! A position is a minimum when both immediate neighbours are strictly
//! greater, a maximum when both are strictly lesser. Boundary positions never
//! have two neighbours and are never flagged. Comparisons follow IEEE
//! semantics, so a NaN on either side of a comparison never flags.

/// Minima/maxima flags, one entry per position of the analysed series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotFlags {
    pub minima: Vec<bool>,
    pub maxima: Vec<bool>,
}

impl PivotFlags {
    fn all_false(len: usize) -> Self {
        Self {
            minima: vec![false; len],
            maxima: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.minima.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minima.is_empty()
    }

    /// Place flags computed on a filtered series back onto `len` original
    /// positions. Positions absent from `source_index` stay false.
    pub fn scatter(&self, source_index: &[usize], len: usize) -> Self {
        let mut out = Self::all_false(len);
        for (j, &orig) in source_index.iter().enumerate().take(self.len()) {
            if orig < len {
                out.minima[orig] = self.minima[j];
                out.maxima[orig] = self.maxima[j];
            }
        }
        out
    }

    pub fn minima_positions(&self) -> Vec<usize> {
        positions(&self.minima)
    }

    pub fn maxima_positions(&self) -> Vec<usize> {
        positions(&self.maxima)
    }
}

fn positions(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(i, &f)| f.then_some(i))
        .collect()
}

/// A series with consecutive duplicates removed, plus where each kept value
/// came from in the original series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupedSeries {
    pub values: Vec<f64>,
    /// `source_index[j]` is the original position of `values[j]`.
    pub source_index: Vec<usize>,
}

/// Drop every element equal to its immediate successor.
///
/// The last element of each run survives, and so does the final element of
/// the series. NaN is never equal to anything, so NaNs are always kept.
pub fn dedupe_consecutive(prices: &[f64]) -> DedupedSeries {
    let mut out = DedupedSeries {
        values: Vec::with_capacity(prices.len()),
        source_index: Vec::with_capacity(prices.len()),
    };
    for (i, &price) in prices.iter().enumerate() {
        let repeated = prices.get(i + 1).is_some_and(|&next| next == price);
        if !repeated {
            out.values.push(price);
            out.source_index.push(i);
        }
    }
    out
}

/// Flag local minima and maxima with a centred window of three.
///
/// With `dedupe_consecutive` the series is filtered first and the returned
/// flags are aligned to the filtered series, not to `prices`. Use
/// [`detect_pivots_aligned`] when flags are needed per original position.
pub fn detect_pivots(prices: &[f64], dedupe_consecutive: bool) -> PivotFlags {
    if dedupe_consecutive {
        window_pivots(&self::dedupe_consecutive(prices).values)
    } else {
        window_pivots(prices)
    }
}

/// Like [`detect_pivots`], but always one flag per position of `prices`.
/// Positions removed by de-duplication are never pivots.
pub fn detect_pivots_aligned(prices: &[f64], dedupe_consecutive: bool) -> PivotFlags {
    if !dedupe_consecutive {
        return window_pivots(prices);
    }
    let deduped = self::dedupe_consecutive(prices);
    window_pivots(&deduped.values).scatter(&deduped.source_index, prices.len())
}

fn window_pivots(series: &[f64]) -> PivotFlags {
    let mut flags = PivotFlags::all_false(series.len());
    for (w, window) in series.windows(3).enumerate() {
        let (x0, x1, x2) = (window[0], window[1], window[2]);
        // Centre of window `w` sits at position `w + 1`.
        flags.minima[w + 1] = x0 > x1 && x2 > x1;
        flags.maxima[w + 1] = x0 < x1 && x2 < x1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    const F: bool = false;
    const T: bool = true;

    #[test]
    fn short_series_has_no_pivots() {
        for series in [vec![], vec![1.0], vec![1.0, 2.0]] {
            for dedupe in [false, true] {
                let flags = detect_pivots(&series, dedupe);
                assert_eq!(flags.len(), series.len());
                assert!(flags.minima.iter().chain(&flags.maxima).all(|f| !f));
            }
        }
    }

    #[test]
    fn valley_is_a_minimum() {
        let flags = detect_pivots(&[3.0, 1.0, 3.0], false);
        assert_eq!(flags.minima, vec![F, T, F]);
        assert_eq!(flags.maxima, vec![F, F, F]);
    }

    #[test]
    fn peak_is_a_maximum() {
        let flags = detect_pivots(&[1.0, 3.0, 1.0], false);
        assert_eq!(flags.minima, vec![F, F, F]);
        assert_eq!(flags.maxima, vec![F, T, F]);
    }

    #[test]
    fn constant_series_has_no_pivots() {
        let prices = [2.0, 2.0, 2.0];
        let plain = detect_pivots(&prices, false);
        assert_eq!(plain.minima, vec![F, F, F]);
        assert_eq!(plain.maxima, vec![F, F, F]);

        let deduped = detect_pivots(&prices, true);
        assert_eq!(deduped.len(), 1);
        assert!(!deduped.minima[0] && !deduped.maxima[0]);
    }

    #[test]
    fn monotone_series_has_no_pivots() {
        let up: Vec<f64> = (0..50).map(f64::from).collect();
        let down: Vec<f64> = up.iter().rev().copied().collect();
        for series in [up, down] {
            let flags = detect_pivots(&series, false);
            assert!(flags.minima_positions().is_empty());
            assert!(flags.maxima_positions().is_empty());
        }
    }

    #[test]
    fn dedupe_collapses_runs_before_windowing() {
        let prices = [5.0, 5.0, 5.0, 1.0, 9.0, 1.0];
        let flags = detect_pivots(&prices, true);
        // Filtered series is [5, 1, 9, 1].
        assert_eq!(flags.len(), 4);
        assert_eq!(flags.minima, vec![F, T, F, F]);
        assert_eq!(flags.maxima, vec![F, F, T, F]);
    }

    #[test]
    fn dedupe_keeps_last_of_each_run_and_maps_back() {
        let deduped = dedupe_consecutive(&[5.0, 5.0, 5.0, 1.0, 9.0, 9.0, 1.0]);
        assert_eq!(deduped.values, vec![5.0, 1.0, 9.0, 1.0]);
        assert_eq!(deduped.source_index, vec![2, 3, 5, 6]);
    }

    #[test]
    fn dedupe_keeps_nan() {
        let deduped = dedupe_consecutive(&[f64::NAN, f64::NAN, 1.0]);
        assert_eq!(deduped.source_index, vec![0, 1, 2]);
    }

    #[test]
    fn plateau_is_not_a_pivot_without_dedupe() {
        let prices = [3.0, 1.0, 1.0, 3.0];
        let plain = detect_pivots(&prices, false);
        assert!(plain.minima_positions().is_empty());

        // After collapsing the plateau the valley shows up on its last sample.
        let aligned = detect_pivots_aligned(&prices, true);
        assert_eq!(aligned.minima, vec![F, F, T, F]);
    }

    #[test]
    fn aligned_flags_follow_original_positions() {
        let prices = [5.0, 5.0, 5.0, 1.0, 9.0, 9.0, 1.0];
        let aligned = detect_pivots_aligned(&prices, true);
        assert_eq!(aligned.len(), prices.len());
        assert_eq!(aligned.minima_positions(), vec![3]);
        assert_eq!(aligned.maxima_positions(), vec![5]);
    }

    #[test]
    fn nan_never_flags() {
        let prices = [3.0, f64::NAN, 3.0, 1.0, f64::NAN, 0.0, 5.0, 2.0, 5.0];
        for dedupe in [false, true] {
            let flags = detect_pivots_aligned(&prices, dedupe);
            assert!(!flags.minima[1] && !flags.maxima[1]);
            assert!(!flags.minima[4] && !flags.maxima[4]);
            // Neighbours of a NaN cannot satisfy both comparisons either.
            assert!(!flags.minima[3] && !flags.maxima[2]);
        }
        // Away from the NaNs, pivots are still found.
        assert!(detect_pivots(&prices, false).minima[7]);
    }

    #[test]
    fn scatter_ignores_out_of_range_sources() {
        let flags = PivotFlags {
            minima: vec![T, F],
            maxima: vec![F, T],
        };
        let out = flags.scatter(&[0, 10], 3);
        assert_eq!(out.minima, vec![T, F, F]);
        assert_eq!(out.maxima, vec![F, F, F]);
    }
}
