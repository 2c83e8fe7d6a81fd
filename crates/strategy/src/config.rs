use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use common::Timeframe;

use crate::error::{Result, StrategyError};

/// Top-level strategy config file (TOML).
///
/// Example `config/strategies.toml`:
/// ```toml
/// [[strategy]]
/// type = "trends"
/// name = "BTC pivots"
/// pair = "BTC/USDT"
/// timeframe = "1h"
/// stoploss = -0.08
///
/// [strategy.minimal_roi]
/// "0" = 0.04
/// "60" = 0.01
///
/// [strategy.params]
/// buy_rsi = 25
/// pivot_mode = "dedupe"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyFileConfig {
    #[serde(rename = "strategy", default)]
    pub strategies: Vec<StrategyConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyConfig {
    /// Strategy type identifier: "trends" or "extreme_rsi_macd_cross".
    #[serde(rename = "type")]
    pub strategy_type: String,
    /// Human-readable name shown in logs.
    pub name: String,
    /// Trading pair, e.g. "BTC/USDT".
    pub pair: String,
    /// Overrides the strategy's own timeframe.
    #[serde(default)]
    pub timeframe: Option<Timeframe>,
    #[serde(default)]
    pub stoploss: Option<f64>,
    /// Minutes since entry -> minimum profit ratio.
    #[serde(default)]
    pub minimal_roi: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub trailing_stop: Option<bool>,
    /// Allow `enter_short` / `exit_short` signals.
    #[serde(default)]
    pub can_short: Option<bool>,
    #[serde(default)]
    pub startup_candle_count: Option<usize>,
    #[serde(default)]
    pub order_types: Option<OrderTypes>,
    #[serde(default)]
    pub order_time_in_force: Option<OrderTimeInForce>,
    /// Indicator-specific parameters.
    #[serde(default)]
    pub params: HashMap<String, toml::Value>,
}

impl StrategyFileConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let cfg = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), strategies = cfg.strategies.len(), "Loaded strategy config");
        Ok(cfg)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl StrategyConfig {
    fn invalid(&self, name: &str, reason: impl Into<String>) -> StrategyError {
        StrategyError::InvalidParam {
            strategy: self.name.clone(),
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn param_usize(&self, key: &str, default: usize) -> Result<usize> {
        match self.params.get(key) {
            None => Ok(default),
            Some(toml::Value::Integer(v)) => {
                usize::try_from(*v).map_err(|_| self.invalid(key, format!("{v} is negative")))
            }
            Some(other) => Err(self.invalid(key, format!("expected an integer, got {other}"))),
        }
    }

    pub fn param_bool(&self, key: &str, default: bool) -> Result<bool> {
        match self.params.get(key) {
            None => Ok(default),
            Some(toml::Value::Boolean(v)) => Ok(*v),
            Some(other) => Err(self.invalid(key, format!("expected a boolean, got {other}"))),
        }
    }

    pub fn param_str<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str> {
        match self.params.get(key) {
            None => Ok(default),
            Some(toml::Value::String(v)) => Ok(v.as_str()),
            Some(other) => Err(self.invalid(key, format!("expected a string, got {other}"))),
        }
    }
}

/// Search space a hyper-parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamSpace {
    Buy,
    Sell,
}

/// Integer hyper-parameter with an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntParameter {
    pub low: i64,
    pub high: i64,
    pub default: i64,
    pub space: ParamSpace,
}

impl IntParameter {
    pub const fn new(low: i64, high: i64, default: i64, space: ParamSpace) -> Self {
        Self { low, high, default, space }
    }

    /// Value configured under `key`, or the default. Out-of-range values are rejected.
    pub fn resolve(&self, cfg: &StrategyConfig, key: &str) -> Result<i64> {
        let value = match cfg.params.get(key) {
            None => self.default,
            Some(toml::Value::Integer(v)) => *v,
            Some(other) => return Err(cfg.invalid(key, format!("expected an integer, got {other}"))),
        };
        if !(self.low..=self.high).contains(&value) {
            return Err(cfg.invalid(
                key,
                format!("{value} outside {}..={}", self.low, self.high),
            ));
        }
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Limit,
    Market,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good till cancelled.
    #[serde(alias = "gtc")]
    Gtc,
    /// Fill or kill.
    #[serde(alias = "fok")]
    Fok,
    /// Immediate or cancel.
    #[serde(alias = "ioc")]
    Ioc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTypes {
    pub entry: OrderKind,
    pub exit: OrderKind,
    pub stoploss: OrderKind,
    #[serde(default)]
    pub stoploss_on_exchange: bool,
    /// Seconds between stop-loss order refreshes on the exchange.
    #[serde(default)]
    pub stoploss_on_exchange_interval: Option<u64>,
    #[serde(default)]
    pub stoploss_on_exchange_limit_ratio: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTimeInForce {
    pub entry: TimeInForce,
    pub exit: TimeInForce,
}

/// Plot hint for one indicator column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl PlotStyle {
    pub fn color(color: &str) -> Self {
        Self { color: Some(color.to_string()) }
    }
}

/// Which indicator columns a chart should show, and where.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub main_plot: BTreeMap<String, PlotStyle>,
    pub subplots: BTreeMap<String, BTreeMap<String, PlotStyle>>,
}

/// Minimal ROI table: minutes since entry -> required profit ratio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinimalRoi(BTreeMap<u32, f64>);

impl MinimalRoi {
    pub fn from_pairs(pairs: &[(u32, f64)]) -> Self {
        Self(pairs.iter().copied().collect())
    }

    pub fn entries(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.0.iter().map(|(&m, &r)| (m, r))
    }

    /// Ratio in force `minutes` after entry: the entry with the largest key
    /// not exceeding `minutes`.
    pub fn ratio_at(&self, minutes: u32) -> Option<f64> {
        self.0.range(..=minutes).next_back().map(|(_, &r)| r)
    }
}

/// Static settings a strategy declares to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySettings {
    pub timeframe: Timeframe,
    pub minimal_roi: MinimalRoi,
    pub stoploss: f64,
    pub trailing_stop: bool,
    pub process_only_new_candles: bool,
    pub use_exit_signal: bool,
    pub exit_profit_only: bool,
    pub ignore_roi_if_entry_signal: bool,
    pub can_short: bool,
    /// Candles needed before the first valid signal.
    pub startup_candle_count: usize,
    pub order_types: OrderTypes,
    pub order_time_in_force: OrderTimeInForce,
    pub plot_config: PlotConfig,
}

impl StrategySettings {
    /// Apply per-instance overrides from the config file and validate the result.
    pub fn with_overrides(mut self, cfg: &StrategyConfig) -> Result<Self> {
        if let Some(tf) = cfg.timeframe {
            self.timeframe = tf;
        }
        if let Some(sl) = cfg.stoploss {
            if !(sl < 0.0 && sl > -1.0) {
                return Err(cfg.invalid("stoploss", format!("{sl} must lie in (-1, 0)")));
            }
            self.stoploss = sl;
        }
        if let Some(roi) = &cfg.minimal_roi {
            let mut table = BTreeMap::new();
            for (minutes, &ratio) in roi {
                let minutes: u32 = minutes.trim().parse().map_err(|_| {
                    cfg.invalid("minimal_roi", format!("key '{minutes}' is not a whole number of minutes"))
                })?;
                table.insert(minutes, ratio);
            }
            self.minimal_roi = MinimalRoi(table);
        }
        if let Some(trailing) = cfg.trailing_stop {
            self.trailing_stop = trailing;
        }
        if let Some(can_short) = cfg.can_short {
            self.can_short = can_short;
        }
        if let Some(count) = cfg.startup_candle_count {
            self.startup_candle_count = count;
        }
        if let Some(order_types) = &cfg.order_types {
            self.order_types = order_types.clone();
        }
        if let Some(tif) = cfg.order_time_in_force {
            self.order_time_in_force = tif;
        }
        Ok(self)
    }
}
