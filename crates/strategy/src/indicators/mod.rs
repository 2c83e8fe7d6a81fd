pub mod bollinger;
pub mod cross;
pub mod derivatives;
pub mod levels;
pub mod macd;
pub mod moving;
pub mod pivots;
pub mod rsi;
pub mod tema;

pub use bollinger::{bollinger_bands, BollingerBands};
pub use cross::{crossed_above, crossed_below};
pub use derivatives::{acceleration, differential_pivots, momentum};
pub use levels::{pivot_levels, PivotLevels};
pub use macd::{MacdIndicator, MacdSeries};
pub use pivots::{detect_pivots, detect_pivots_aligned, dedupe_consecutive, DedupedSeries, PivotFlags};
pub use rsi::RsiIndicator;
pub use tema::tema;
