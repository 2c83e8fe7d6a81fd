use std::collections::HashSet;

use tokio::sync::broadcast;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use common::{Candle, MarketEvent, Signal, Timeframe};

use crate::config::StrategyFileConfig;
use crate::error::{Result, StrategyError};
use crate::frame::{IndicatorFrame, ENTER_LONG, ENTER_SHORT, EXIT_LONG, EXIT_SHORT};
use crate::provider::DataProvider;
use crate::strategies::build_strategy;
use crate::Strategy;

/// Holds all active strategy instances, the candle history they read, and
/// turns closed candles into signals.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn Strategy>>,
    data: DataProvider,
}

impl StrategyRegistry {
    /// Build the registry from config. Unknown strategy types, invalid
    /// parameters and duplicate names are errors.
    pub fn from_config(file_cfg: &StrategyFileConfig, max_history: usize) -> Result<Self> {
        let mut strategies: Vec<Box<dyn Strategy>> = Vec::new();
        let mut names = HashSet::new();

        for cfg in &file_cfg.strategies {
            if !names.insert(cfg.name.clone()) {
                return Err(StrategyError::DuplicateName(cfg.name.clone()));
            }
            let strategy = build_strategy(cfg)?;
            let settings = strategy.settings();
            if settings.startup_candle_count > max_history {
                warn!(
                    name = %strategy.name(),
                    startup = settings.startup_candle_count,
                    max_history,
                    "History limit below startup candle count; strategy will never signal"
                );
            }
            info!(
                name = %strategy.name(),
                pair = %strategy.pair(),
                timeframe = %settings.timeframe,
                "Registered strategy"
            );
            strategies.push(strategy);
        }

        let mut whitelist: Vec<String> = Vec::new();
        for s in &strategies {
            if !whitelist.iter().any(|p| p == s.pair()) {
                whitelist.push(s.pair().to_string());
            }
        }

        Ok(Self {
            strategies,
            data: DataProvider::new(whitelist, max_history),
        })
    }

    /// Distinct traded pairs, in declaration order.
    pub fn whitelist(&self) -> &[String] {
        self.data.whitelist()
    }

    pub fn strategy_names(&self) -> impl Iterator<Item = &str> {
        self.strategies.iter().map(|s| s.name())
    }

    /// Every pair/timeframe whose candles some strategy needs: its own plus
    /// its informative pairs.
    pub fn subscriptions(&self) -> Vec<(String, Timeframe)> {
        let mut out: Vec<(String, Timeframe)> = Vec::new();
        for s in &self.strategies {
            let own = (s.pair().to_string(), s.settings().timeframe);
            for sub in std::iter::once(own).chain(s.informative_pairs(self.whitelist())) {
                if !out.contains(&sub) {
                    out.push(sub);
                }
            }
        }
        out
    }

    pub fn history(&self, pair: &str, timeframe: Timeframe) -> &[Candle] {
        self.data.candles(pair, timeframe)
    }

    /// Preload history, e.g. from a candle dump, before events start flowing.
    pub fn seed(&mut self, pair: &str, timeframe: Timeframe, candles: Vec<Candle>) {
        self.data.insert(pair, timeframe, candles);
    }

    /// Run the full lifecycle of strategy `name` over its accumulated history.
    pub fn analyze(&self, name: &str) -> Result<IndicatorFrame> {
        let strategy = self
            .strategies
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| StrategyError::UnknownStrategy(name.to_string()))?;
        self.analyze_strategy(strategy.as_ref())
    }

    fn analyze_strategy(&self, strategy: &dyn Strategy) -> Result<IndicatorFrame> {
        let candles = self
            .data
            .candles(strategy.pair(), strategy.settings().timeframe)
            .to_vec();
        strategy.analyze(candles, &self.data)
    }

    /// Process one market event. Returns signals from all strategies trading
    /// the event's pair on the event's timeframe. A strategy that fails to
    /// refresh is logged and skipped.
    pub fn process(&mut self, event: &MarketEvent) -> Vec<Signal> {
        if !event.is_candle_closed {
            return Vec::new();
        }
        if !self.data.push(&event.pair, event.timeframe, event.candle) {
            debug!(pair = %event.pair, timeframe = %event.timeframe, "Ignoring stale candle");
            return Vec::new();
        }

        let history_len = self.data.candles(&event.pair, event.timeframe).len();
        let mut signals = Vec::new();
        for strategy in self
            .strategies
            .iter()
            .filter(|s| s.pair() == event.pair && s.settings().timeframe == event.timeframe)
        {
            if history_len < strategy.settings().startup_candle_count {
                continue;
            }
            match self.analyze_strategy(strategy.as_ref()) {
                Ok(frame) => signals.extend(last_row_signals(strategy.name(), &frame)),
                Err(e) => warn!(name = %strategy.name(), error = %e, "Strategy refresh failed"),
            }
        }
        signals
    }

    /// Run the strategy dispatch loop.
    /// Reads from `market_rx`, pushes signals to `signal_tx`.
    pub async fn run(
        mut self,
        mut market_rx: broadcast::Receiver<MarketEvent>,
        signal_tx: mpsc::Sender<Signal>,
    ) -> Self {
        info!("StrategyRegistry running");
        loop {
            match market_rx.recv().await {
                Ok(event) => {
                    let signals = self.process(&event);
                    for signal in signals {
                        if signal_tx.send(signal).await.is_err() {
                            warn!("Signal channel closed — stopping strategy registry");
                            return self;
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(dropped = n, "Strategy registry lagged — dropped market events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("Market broadcast channel closed");
                    return self;
                }
            }
        }
    }
}

/// Signals set on the most recent row of an analysed frame.
fn last_row_signals(strategy: &str, frame: &IndicatorFrame) -> Vec<Signal> {
    let Some(last) = frame.candles().last() else {
        return Vec::new();
    };
    let row = frame.len() - 1;
    let pair = frame.pair().to_string();
    let strategy = strategy.to_string();
    let timestamp = last.timestamp;

    let mut signals = Vec::new();
    if frame.flag(ENTER_LONG, row) {
        signals.push(Signal::EnterLong { pair: pair.clone(), strategy: strategy.clone(), timestamp });
    }
    if frame.flag(ENTER_SHORT, row) {
        signals.push(Signal::EnterShort { pair: pair.clone(), strategy: strategy.clone(), timestamp });
    }
    if frame.flag(EXIT_LONG, row) {
        signals.push(Signal::ExitLong { pair: pair.clone(), strategy: strategy.clone(), timestamp });
    }
    if frame.flag(EXIT_SHORT, row) {
        signals.push(Signal::ExitShort { pair, strategy, timestamp });
    }
    signals
}
