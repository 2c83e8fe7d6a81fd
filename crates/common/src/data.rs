//! Candle dumps on disk.
//!
//! The dump format is the one exchange downloaders write: a JSON array of
//! rows `[open_time_ms, open, high, low, close, volume]`, oldest first.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::{Candle, Error, Result, Timeframe};

/// File name of the dump for a pair, e.g. `BTC/USDT` + `1h` -> `BTC_USDT-1h.json`.
pub fn dump_file_name(pair: &str, timeframe: Timeframe) -> String {
    format!("{}-{timeframe}.json", pair.replace(['/', ':'], "_"))
}

pub fn dump_path(data_dir: &Path, pair: &str, timeframe: Timeframe) -> PathBuf {
    data_dir.join(dump_file_name(pair, timeframe))
}

/// Read and parse a candle dump.
pub fn load_candles(path: &Path) -> Result<Vec<Candle>> {
    let raw = std::fs::read_to_string(path)?;
    let candles = parse_candles(&raw)?;
    debug!(path = %path.display(), candles = candles.len(), "Loaded candle dump");
    Ok(candles)
}

/// Parse a candle dump. Rows must be strictly ordered by open time.
pub fn parse_candles(raw: &str) -> Result<Vec<Candle>> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(raw)?;
    let mut candles: Vec<Candle> = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let candle = parse_row(row).map_err(|e| Error::Data(format!("row {i}: {e}")))?;
        if let Some(prev) = candles.last() {
            if candle.timestamp <= prev.timestamp {
                return Err(Error::Data(format!(
                    "row {i}: open time {} not after {}",
                    candle.timestamp, prev.timestamp
                )));
            }
        }
        candles.push(candle);
    }
    Ok(candles)
}

fn parse_row(row: &[Value]) -> std::result::Result<Candle, String> {
    if row.len() < 6 {
        return Err(format!("expected 6 fields, got {}", row.len()));
    }
    let millis = row[0].as_i64().ok_or("open time is not an integer")?;
    let timestamp = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| format!("open time {millis} out of range"))?;

    let field = |idx: usize, name: &str| -> std::result::Result<f64, String> {
        match &row[idx] {
            Value::Number(n) => n.as_f64().ok_or_else(|| format!("{name} is not finite")),
            // Some downloaders quote prices.
            Value::String(s) => s.parse().map_err(|_| format!("{name} '{s}' is not a number")),
            // Missing values stay NaN so indicators skip them.
            Value::Null => Ok(f64::NAN),
            other => Err(format!("{name} has unexpected value {other}")),
        }
    };

    Ok(Candle {
        timestamp,
        open: field(1, "open")?,
        high: field(2, "high")?,
        low: field(3, "low")?,
        close: field(4, "close")?,
        volume: field(5, "volume")?,
    })
}
