pub mod config;
pub mod error;
pub mod frame;
pub mod indicators;
pub mod provider;
pub mod registry;
pub mod strategies;

pub use config::{StrategyConfig, StrategyFileConfig, StrategySettings};
pub use error::{Result, StrategyError};
pub use frame::IndicatorFrame;
pub use provider::DataProvider;
pub use registry::StrategyRegistry;

use common::{Candle, Timeframe};

/// All strategy implementations must satisfy this trait.
///
/// The lifecycle mirrors what a trading host drives on every refresh:
/// `populate_indicators`, then `populate_entry_trend` and
/// `populate_exit_trend` over the same frame.
pub trait Strategy: Send + Sync {
    /// Human-readable name of this strategy instance.
    fn name(&self) -> &str;

    /// The trading pair this strategy watches (e.g. "BTC/USDT").
    fn pair(&self) -> &str;

    /// Static settings declared to the host (timeframe, ROI, stop-loss, ...).
    fn settings(&self) -> &StrategySettings;

    /// Extra non-traded pair/timeframe combinations whose candles the
    /// strategy reads through the `DataProvider`.
    fn informative_pairs(&self, _whitelist: &[String]) -> Vec<(String, Timeframe)> {
        Vec::new()
    }

    /// Add indicator columns to `frame`.
    fn populate_indicators(&self, frame: &mut IndicatorFrame, data: &DataProvider) -> Result<()>;

    /// Mark `enter_long` / `enter_short` rows.
    fn populate_entry_trend(&self, frame: &mut IndicatorFrame) -> Result<()>;

    /// Mark `exit_long` / `exit_short` rows.
    fn populate_exit_trend(&self, _frame: &mut IndicatorFrame) -> Result<()> {
        Ok(())
    }

    /// Run the whole lifecycle over `candles` (oldest first).
    fn analyze(&self, candles: Vec<Candle>, data: &DataProvider) -> Result<IndicatorFrame> {
        let mut frame = IndicatorFrame::new(self.pair(), self.settings().timeframe, candles);
        self.populate_indicators(&mut frame, data)?;
        self.populate_entry_trend(&mut frame)?;
        self.populate_exit_trend(&mut frame)?;
        Ok(frame)
    }
}
