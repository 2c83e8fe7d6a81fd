use proptest::prelude::*;
use strategy::indicators::{dedupe_consecutive, detect_pivots, detect_pivots_aligned};

/// Prices drawn from a small set so that runs of equal values are common.
fn choppy_prices(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((0u8..6).prop_map(f64::from), 0..max_len)
}

/// Prices with NaN mixed in.
fn prices_with_nan(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![
            4 => (-1_000.0f64..1_000.0).boxed(),
            1 => Just(f64::NAN).boxed(),
        ],
        0..max_len,
    )
}

proptest! {
    /// Fewer than three prices can never hold a pivot.
    #[test]
    fn short_series_never_flag(prices in prop::collection::vec(-1e6f64..1e6, 0..3), dedupe: bool) {
        let flags = detect_pivots(&prices, dedupe);
        prop_assert!(flags.minima.iter().chain(&flags.maxima).all(|f| !f));
    }

    /// Strictly monotone series have no turning points, with or without dedupe.
    #[test]
    fn monotone_series_never_flag(
        start in -1e6f64..1e6,
        steps in prop::collection::vec(0.001f64..100.0, 0..200),
        descending: bool,
        dedupe: bool,
    ) {
        let mut prices = vec![start];
        for step in steps {
            let last = prices[prices.len() - 1];
            prices.push(if descending { last - step } else { last + step });
        }
        let flags = detect_pivots(&prices, dedupe);
        prop_assert!(flags.minima_positions().is_empty());
        prop_assert!(flags.maxima_positions().is_empty());
    }

    /// Both flag sequences match the length of the series they were computed on.
    #[test]
    fn flag_lengths_match_series(prices in choppy_prices(200)) {
        let plain = detect_pivots(&prices, false);
        prop_assert_eq!(plain.minima.len(), prices.len());
        prop_assert_eq!(plain.maxima.len(), prices.len());

        let filtered = dedupe_consecutive(&prices);
        let deduped = detect_pivots(&prices, true);
        prop_assert_eq!(deduped.minima.len(), filtered.values.len());
        prop_assert_eq!(deduped.maxima.len(), filtered.values.len());

        let aligned = detect_pivots_aligned(&prices, true);
        prop_assert_eq!(aligned.len(), prices.len());
    }

    /// A NaN position is never flagged, in either mode.
    #[test]
    fn nan_is_never_a_pivot(prices in prices_with_nan(200), dedupe: bool) {
        let flags = detect_pivots_aligned(&prices, dedupe);
        for (i, price) in prices.iter().enumerate() {
            if price.is_nan() {
                prop_assert!(!flags.minima[i] && !flags.maxima[i], "NaN flagged at {}", i);
            }
        }
    }

    /// A position is never both a minimum and a maximum.
    #[test]
    fn minima_and_maxima_are_disjoint(prices in prices_with_nan(200), dedupe: bool) {
        let flags = detect_pivots_aligned(&prices, dedupe);
        prop_assert!(flags.minima.iter().zip(&flags.maxima).all(|(lo, hi)| !(lo & hi)));
    }

    /// The filtered series has no equal neighbours and indexes back correctly.
    #[test]
    fn dedupe_index_map_points_at_kept_values(prices in choppy_prices(200)) {
        let deduped = dedupe_consecutive(&prices);
        prop_assert_eq!(deduped.values.len(), deduped.source_index.len());
        prop_assert!(deduped.values.windows(2).all(|w| w[0] != w[1]));
        prop_assert!(deduped.source_index.windows(2).all(|w| w[0] < w[1]));
        for (value, &orig) in deduped.values.iter().zip(&deduped.source_index) {
            prop_assert_eq!(*value, prices[orig]);
        }
        if let Some(&last) = deduped.source_index.last() {
            prop_assert_eq!(last, prices.len() - 1);
        }
    }

    /// Flags placed back on original positions agree with the filtered flags.
    #[test]
    fn aligned_flags_agree_with_filtered_flags(prices in choppy_prices(200)) {
        let deduped = dedupe_consecutive(&prices);
        let filtered = detect_pivots(&prices, true);
        let aligned = detect_pivots_aligned(&prices, true);

        prop_assert_eq!(aligned.minima_positions().len(), filtered.minima_positions().len());
        prop_assert_eq!(aligned.maxima_positions().len(), filtered.maxima_positions().len());
        for (j, &orig) in deduped.source_index.iter().enumerate() {
            prop_assert_eq!(aligned.minima[orig], filtered.minima[j]);
            prop_assert_eq!(aligned.maxima[orig], filtered.maxima[j]);
        }
    }
}
