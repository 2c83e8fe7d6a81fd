pub mod rsi_macd_cross;
pub mod trends;

pub use rsi_macd_cross::RsiMacdCrossStrategy;
pub use trends::{PivotMode, TrendsStrategy};

use crate::config::StrategyConfig;
use crate::error::{Result, StrategyError};
use crate::Strategy;

/// Instantiate the strategy named by `cfg.strategy_type`.
pub fn build_strategy(cfg: &StrategyConfig) -> Result<Box<dyn Strategy>> {
    match cfg.strategy_type.as_str() {
        TrendsStrategy::TYPE => Ok(Box::new(TrendsStrategy::from_config(cfg)?)),
        RsiMacdCrossStrategy::TYPE => Ok(Box::new(RsiMacdCrossStrategy::from_config(cfg)?)),
        other => Err(StrategyError::UnknownType(other.to_string())),
    }
}
