use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// One OHLCV candle. `timestamp` is the candle open time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// `(high + low + close) / 3`.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// Candle width in whole minutes.
///
/// Written the way exchanges label klines: `5m`, `15m`, `1h`, `4h`, `1d`, `1w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timeframe {
    minutes: u32,
}

impl Timeframe {
    const HOUR: u32 = 60;
    const DAY: u32 = 24 * Self::HOUR;
    const WEEK: u32 = 7 * Self::DAY;

    pub const M5: Self = Self { minutes: 5 };
    pub const M15: Self = Self { minutes: 15 };
    pub const H1: Self = Self { minutes: Self::HOUR };
    pub const D1: Self = Self { minutes: Self::DAY };

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes > 0).then_some(Self { minutes })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.minutes))
    }
}

impl FromStr for Timeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || Error::Timeframe(s.to_string());

        let unit = s.chars().last().ok_or_else(invalid)?;
        let count: u32 = s[..s.len() - unit.len_utf8()].parse().map_err(|_| invalid())?;
        let scale = match unit {
            'm' => 1,
            'h' => Self::HOUR,
            'd' => Self::DAY,
            'w' => Self::WEEK,
            _ => return Err(invalid()),
        };
        count
            .checked_mul(scale)
            .and_then(Self::from_minutes)
            .ok_or_else(invalid)
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let m = self.minutes;
        if m % Self::WEEK == 0 {
            write!(f, "{}w", m / Self::WEEK)
        } else if m % Self::DAY == 0 {
            write!(f, "{}d", m / Self::DAY)
        } else if m % Self::HOUR == 0 {
            write!(f, "{}h", m / Self::HOUR)
        } else {
            write!(f, "{m}m")
        }
    }
}

impl Serialize for Timeframe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timeframe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Candle update for one pair/timeframe, as delivered by the host's data feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEvent {
    pub pair: String,
    pub timeframe: Timeframe,
    pub candle: Candle,
    /// True when the candle has closed (finalized). Only closed candles
    /// are accumulated into indicator history.
    pub is_candle_closed: bool,
}

/// Signal emitted by a strategy for the latest analysed candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Signal {
    EnterLong { pair: String, strategy: String, timestamp: DateTime<Utc> },
    EnterShort { pair: String, strategy: String, timestamp: DateTime<Utc> },
    ExitLong { pair: String, strategy: String, timestamp: DateTime<Utc> },
    ExitShort { pair: String, strategy: String, timestamp: DateTime<Utc> },
}

impl Signal {
    pub fn pair(&self) -> &str {
        match self {
            Signal::EnterLong { pair, .. }
            | Signal::EnterShort { pair, .. }
            | Signal::ExitLong { pair, .. }
            | Signal::ExitShort { pair, .. } => pair,
        }
    }

    pub fn strategy(&self) -> &str {
        match self {
            Signal::EnterLong { strategy, .. }
            | Signal::EnterShort { strategy, .. }
            | Signal::ExitLong { strategy, .. }
            | Signal::ExitShort { strategy, .. } => strategy,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Signal::EnterLong { timestamp, .. }
            | Signal::EnterShort { timestamp, .. }
            | Signal::ExitLong { timestamp, .. }
            | Signal::ExitShort { timestamp, .. } => *timestamp,
        }
    }

    pub fn side(&self) -> TradeSide {
        match self {
            Signal::EnterLong { .. } | Signal::ExitLong { .. } => TradeSide::Long,
            Signal::EnterShort { .. } | Signal::ExitShort { .. } => TradeSide::Short,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, Signal::EnterLong { .. } | Signal::EnterShort { .. })
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = if self.is_entry() { "enter" } else { "exit" };
        write!(f, "{action} {} {}", self.side(), self.pair())
    }
}

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Long,
    Short,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Long => write!(f, "long"),
            TradeSide::Short => write!(f, "short"),
        }
    }
}
