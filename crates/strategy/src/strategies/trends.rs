use tracing::debug;

use common::Timeframe;

use crate::config::{
    IntParameter, MinimalRoi, OrderKind, OrderTimeInForce, OrderTypes, ParamSpace, PlotConfig,
    PlotStyle, StrategyConfig, StrategySettings, TimeInForce,
};
use crate::error::{Result, StrategyError};
use crate::frame::{IndicatorFrame, ENTER_LONG, EXIT_LONG};
use crate::indicators::levels::{DEFAULT_LEVELS, DEFAULT_LEVEL_PERIOD};
use crate::indicators::tema::DEFAULT_TEMA_PERIOD;
use crate::indicators::{
    acceleration, bollinger_bands, detect_pivots_aligned, differential_pivots, momentum,
    pivot_levels, tema, RsiIndicator,
};
use crate::{DataProvider, Strategy};

const BUY_RSI: IntParameter = IntParameter::new(10, 40, 30, ParamSpace::Buy);
const SELL_RSI: IntParameter = IntParameter::new(60, 90, 70, ParamSpace::Sell);

/// How the `min` / `max` pivot columns are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotMode {
    /// Plain centred window over the close.
    Naive,
    /// Collapse runs of equal closes first, so flat tops and bottoms still pivot.
    Dedupe,
}

/// Buys local minima of the close and sells local maxima.
pub struct TrendsStrategy {
    cfg: StrategyConfig,
    settings: StrategySettings,
    rsi: RsiIndicator,
    pivot_mode: PivotMode,
    /// Also add classic pivot/support/resistance levels.
    classic_levels: usize,
    /// Also add finite-difference momentum and its turning points.
    momentum: bool,
    pub buy_rsi: i64,
    pub sell_rsi: i64,
}

impl TrendsStrategy {
    pub const TYPE: &'static str = "trends";

    pub fn default_settings() -> StrategySettings {
        StrategySettings {
            timeframe: Timeframe::H1,
            minimal_roi: MinimalRoi::from_pairs(&[(60, 0.01), (30, 0.02), (0, 0.04)]),
            stoploss: -0.10,
            trailing_stop: false,
            process_only_new_candles: false,
            use_exit_signal: true,
            exit_profit_only: false,
            ignore_roi_if_entry_signal: false,
            can_short: false,
            startup_candle_count: 30,
            order_types: OrderTypes {
                entry: OrderKind::Limit,
                exit: OrderKind::Limit,
                stoploss: OrderKind::Market,
                stoploss_on_exchange: false,
                stoploss_on_exchange_interval: None,
                stoploss_on_exchange_limit_ratio: None,
            },
            order_time_in_force: OrderTimeInForce {
                entry: TimeInForce::Gtc,
                exit: TimeInForce::Gtc,
            },
            plot_config: PlotConfig {
                main_plot: [
                    ("tema".to_string(), PlotStyle::default()),
                    ("sar".to_string(), PlotStyle::color("white")),
                ]
                .into(),
                subplots: [
                    (
                        "MACD".to_string(),
                        [
                            ("macd".to_string(), PlotStyle::color("blue")),
                            ("macdsignal".to_string(), PlotStyle::color("orange")),
                        ]
                        .into(),
                    ),
                    (
                        "RSI".to_string(),
                        [("rsi".to_string(), PlotStyle::color("red"))].into(),
                    ),
                ]
                .into(),
            },
        }
    }

    pub fn from_config(cfg: &StrategyConfig) -> Result<Self> {
        let settings = Self::default_settings().with_overrides(cfg)?;
        let pivot_mode = match cfg.param_str("pivot_mode", "dedupe")? {
            "dedupe" => PivotMode::Dedupe,
            "naive" => PivotMode::Naive,
            other => {
                return Err(StrategyError::InvalidParam {
                    strategy: cfg.name.clone(),
                    name: "pivot_mode".into(),
                    reason: format!("expected 'dedupe' or 'naive', got '{other}'"),
                })
            }
        };
        let classic_levels = if cfg.param_bool("classic_levels", false)? {
            match cfg.param_usize("levels", DEFAULT_LEVELS)? {
                0 => {
                    return Err(StrategyError::InvalidParam {
                        strategy: cfg.name.clone(),
                        name: "levels".into(),
                        reason: "need at least one level with classic_levels on".into(),
                    })
                }
                n => n,
            }
        } else {
            0
        };

        Ok(Self {
            cfg: cfg.clone(),
            settings,
            rsi: RsiIndicator::new(cfg.param_usize("rsi_period", RsiIndicator::DEFAULT_PERIOD)?)?,
            pivot_mode,
            classic_levels,
            momentum: cfg.param_bool("momentum", false)?,
            buy_rsi: BUY_RSI.resolve(cfg, "buy_rsi")?,
            sell_rsi: SELL_RSI.resolve(cfg, "sell_rsi")?,
        })
    }

    pub fn pivot_mode(&self) -> PivotMode {
        self.pivot_mode
    }
}

impl Strategy for TrendsStrategy {
    fn name(&self) -> &str {
        &self.cfg.name
    }

    fn pair(&self) -> &str {
        &self.cfg.pair
    }

    fn settings(&self) -> &StrategySettings {
        &self.settings
    }

    fn populate_indicators(&self, frame: &mut IndicatorFrame, _data: &DataProvider) -> Result<()> {
        let close = frame.close();

        frame.insert_f64("rsi", self.rsi.series(&close))?;
        frame.insert_f64("tema", tema(&close, DEFAULT_TEMA_PERIOD))?;
        let bands = bollinger_bands(&frame.typical_price(), 20, 2.0);
        frame.insert_f64("bb_middleband", bands.mid)?;

        let pivots = detect_pivots_aligned(&close, self.pivot_mode == PivotMode::Dedupe);
        debug!(
            strategy = %self.cfg.name,
            minima = pivots.minima_positions().len(),
            maxima = pivots.maxima_positions().len(),
            "Pivot points detected"
        );
        frame.insert_bool("min", pivots.minima)?;
        frame.insert_bool("max", pivots.maxima)?;

        if self.classic_levels > 0 {
            let levels = pivot_levels(frame.candles(), DEFAULT_LEVEL_PERIOD, self.classic_levels)?;
            frame.insert_f64("pivot", levels.pivot)?;
            for (i, (r, s)) in levels.resistances.into_iter().zip(levels.supports).enumerate() {
                frame.insert_f64(format!("r{}", i + 1), r)?;
                frame.insert_f64(format!("s{}", i + 1), s)?;
            }
        }

        if self.momentum {
            let mom = momentum(&close);
            let (diff_min, diff_max) = differential_pivots(&mom);
            frame.insert_f64("momacc", acceleration(&close))?;
            frame.insert_f64("mom", mom)?;
            frame.insert_bool("diff_min", diff_min)?;
            frame.insert_bool("diff_max", diff_max)?;
        }
        Ok(())
    }

    fn populate_entry_trend(&self, frame: &mut IndicatorFrame) -> Result<()> {
        let minima = frame.bool_column("min")?.to_vec();
        frame.mark(ENTER_LONG, &minima)
    }

    fn populate_exit_trend(&self, frame: &mut IndicatorFrame) -> Result<()> {
        let maxima = frame.bool_column("max")?.to_vec();
        frame.mark(EXIT_LONG, &maxima)
    }
}
