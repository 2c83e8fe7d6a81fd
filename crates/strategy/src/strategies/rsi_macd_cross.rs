use common::Timeframe;

use crate::config::{
    IntParameter, MinimalRoi, OrderKind, OrderTimeInForce, OrderTypes, ParamSpace, PlotConfig,
    PlotStyle, StrategyConfig, StrategySettings, TimeInForce,
};
use crate::error::{Result, StrategyError};
use crate::frame::{IndicatorFrame, ENTER_LONG, ENTER_SHORT};
use crate::indicators::{crossed_above, crossed_below, MacdIndicator, RsiIndicator};
use crate::{DataProvider, Strategy};

const BUY_RSI: IntParameter = IntParameter::new(0, 30, 30, ParamSpace::Buy);
const SELL_RSI: IntParameter = IntParameter::new(70, 100, 70, ParamSpace::Sell);

/// Enters on extreme RSI read from a slower informative timeframe.
///
/// Long when the informative RSI is below `buy_rsi`, short when above
/// `sell_rsi` (only if `can_short`). With `macd_cross`, an entry also needs
/// the MACD line to cross its signal line in the same direction on that
/// candle. Exits are left to the trailing stop.
pub struct RsiMacdCrossStrategy {
    cfg: StrategyConfig,
    settings: StrategySettings,
    informative_timeframe: Timeframe,
    rsi: RsiIndicator,
    macd: MacdIndicator,
    macd_cross: bool,
    pub buy_rsi: i64,
    pub sell_rsi: i64,
}

impl RsiMacdCrossStrategy {
    pub const TYPE: &'static str = "extreme_rsi_macd_cross";

    pub fn default_settings() -> StrategySettings {
        StrategySettings {
            timeframe: Timeframe::M5,
            minimal_roi: MinimalRoi::from_pairs(&[(0, 100.0)]),
            stoploss: -0.02,
            trailing_stop: true,
            process_only_new_candles: true,
            use_exit_signal: true,
            exit_profit_only: false,
            ignore_roi_if_entry_signal: false,
            can_short: false,
            startup_candle_count: 30,
            order_types: OrderTypes {
                entry: OrderKind::Limit,
                exit: OrderKind::Limit,
                stoploss: OrderKind::Market,
                stoploss_on_exchange: true,
                stoploss_on_exchange_interval: Some(60),
                stoploss_on_exchange_limit_ratio: Some(0.99),
            },
            order_time_in_force: OrderTimeInForce {
                entry: TimeInForce::Gtc,
                exit: TimeInForce::Gtc,
            },
            plot_config: PlotConfig {
                main_plot: Default::default(),
                subplots: [
                    (
                        "MACD 5m".to_string(),
                        [
                            ("macd".to_string(), PlotStyle::color("blue")),
                            ("macdsignal".to_string(), PlotStyle::color("red")),
                        ]
                        .into(),
                    ),
                    (
                        "RSI 15m".to_string(),
                        [("rsi_15m".to_string(), PlotStyle::color("orange"))].into(),
                    ),
                ]
                .into(),
            },
        }
    }

    pub fn from_config(cfg: &StrategyConfig) -> Result<Self> {
        let settings = Self::default_settings().with_overrides(cfg)?;
        let informative_timeframe: Timeframe = cfg
            .param_str("informative_timeframe", "15m")?
            .parse()?;
        if informative_timeframe < settings.timeframe {
            return Err(StrategyError::Timeframe {
                base: settings.timeframe.to_string(),
                informative: informative_timeframe.to_string(),
            });
        }

        Ok(Self {
            cfg: cfg.clone(),
            settings,
            informative_timeframe,
            rsi: RsiIndicator::new(cfg.param_usize("rsi_period", RsiIndicator::DEFAULT_PERIOD)?)?,
            macd: MacdIndicator::new(
                cfg.param_usize("macd_fast", 12)?,
                cfg.param_usize("macd_slow", 26)?,
                cfg.param_usize("macd_signal", 9)?,
            )?,
            macd_cross: cfg.param_bool("macd_cross", false)?,
            buy_rsi: BUY_RSI.resolve(cfg, "buy_rsi")?,
            sell_rsi: SELL_RSI.resolve(cfg, "sell_rsi")?,
        })
    }

    /// Name of the merged informative RSI column, e.g. `rsi_15m`.
    pub fn informative_rsi_column(&self) -> String {
        format!("rsi_{}", self.informative_timeframe)
    }
}

impl Strategy for RsiMacdCrossStrategy {
    fn name(&self) -> &str {
        &self.cfg.name
    }

    fn pair(&self) -> &str {
        &self.cfg.pair
    }

    fn settings(&self) -> &StrategySettings {
        &self.settings
    }

    fn informative_pairs(&self, whitelist: &[String]) -> Vec<(String, Timeframe)> {
        whitelist
            .iter()
            .map(|pair| (pair.clone(), self.informative_timeframe))
            .collect()
    }

    fn populate_indicators(&self, frame: &mut IndicatorFrame, data: &DataProvider) -> Result<()> {
        let candles = data.require(&self.cfg.pair, self.informative_timeframe)?;
        let mut informative =
            IndicatorFrame::new(self.cfg.pair.clone(), self.informative_timeframe, candles.to_vec());
        let rsi = self.rsi.series(&informative.close());
        informative.insert_f64("rsi", rsi)?;
        frame.merge_informative(&informative, true)?;

        let macd = self.macd.series(&frame.close());
        frame.insert_f64("macd", macd.macd)?;
        frame.insert_f64("macdsignal", macd.signal)?;
        frame.insert_f64("macdhist", macd.histogram)?;
        Ok(())
    }

    fn populate_entry_trend(&self, frame: &mut IndicatorFrame) -> Result<()> {
        let rsi = frame.f64_column(&self.informative_rsi_column())?;
        let (buy, sell) = (self.buy_rsi as f64, self.sell_rsi as f64);
        let mut oversold: Vec<bool> = rsi.iter().map(|&v| v < buy).collect();
        let mut overbought: Vec<bool> = rsi.iter().map(|&v| v > sell).collect();

        if self.macd_cross {
            let macd = frame.f64_column("macd")?;
            let signal = frame.f64_column("macdsignal")?;
            // Signal line dropping under MACD is a bullish cross.
            let bullish = crossed_below(signal, macd);
            let bearish = crossed_above(signal, macd);
            for (flag, cross) in oversold.iter_mut().zip(&bullish) {
                *flag &= cross;
            }
            for (flag, cross) in overbought.iter_mut().zip(&bearish) {
                *flag &= cross;
            }
        }

        frame.mark(ENTER_LONG, &oversold)?;
        if self.settings.can_short {
            frame.mark(ENTER_SHORT, &overbought)?;
        }
        Ok(())
    }
}
