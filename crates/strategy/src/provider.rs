use std::collections::HashMap;

use common::{Candle, Timeframe};

use crate::error::{Result, StrategyError};

/// Closed-candle history per pair and timeframe, handed to strategies so they
/// can read informative pairs.
#[derive(Debug, Clone)]
pub struct DataProvider {
    histories: HashMap<(String, Timeframe), Vec<Candle>>,
    whitelist: Vec<String>,
    max_history: usize,
}

impl DataProvider {
    pub fn new(whitelist: Vec<String>, max_history: usize) -> Self {
        Self {
            histories: HashMap::new(),
            whitelist,
            max_history: max_history.max(1),
        }
    }

    /// Tradeable pairs, in declaration order.
    pub fn whitelist(&self) -> &[String] {
        &self.whitelist
    }

    /// Append a closed candle. A candle not newer than the last one replaces
    /// it when the open times match and is dropped otherwise. Returns whether
    /// the history changed.
    pub fn push(&mut self, pair: &str, timeframe: Timeframe, candle: Candle) -> bool {
        let history = self
            .histories
            .entry((pair.to_string(), timeframe))
            .or_default();
        match history.last_mut() {
            Some(last) if last.timestamp == candle.timestamp => {
                *last = candle;
            }
            Some(last) if last.timestamp > candle.timestamp => return false,
            _ => history.push(candle),
        }
        if history.len() > self.max_history {
            let excess = history.len() - self.max_history;
            history.drain(..excess);
        }
        true
    }

    /// Replace a whole history, keeping only the newest `max_history` candles.
    pub fn insert(&mut self, pair: &str, timeframe: Timeframe, mut candles: Vec<Candle>) {
        if candles.len() > self.max_history {
            candles.drain(..candles.len() - self.max_history);
        }
        self.histories.insert((pair.to_string(), timeframe), candles);
    }

    /// History for a pair/timeframe; empty if nothing has arrived yet.
    pub fn candles(&self, pair: &str, timeframe: Timeframe) -> &[Candle] {
        self.histories
            .get(&(pair.to_string(), timeframe))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Like [`candles`](Self::candles) but an empty history is an error.
    pub fn require(&self, pair: &str, timeframe: Timeframe) -> Result<&[Candle]> {
        let candles = self.candles(pair, timeframe);
        if candles.is_empty() {
            return Err(StrategyError::MissingInformative {
                pair: pair.to_string(),
                timeframe: timeframe.to_string(),
            });
        }
        Ok(candles)
    }
}
