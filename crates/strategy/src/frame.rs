use std::collections::BTreeMap;

use common::{Candle, Timeframe};

use crate::error::{Result, StrategyError};

/// Entry/exit signal column names written by `populate_entry_trend` /
/// `populate_exit_trend`.
pub const ENTER_LONG: &str = "enter_long";
pub const ENTER_SHORT: &str = "enter_short";
pub const EXIT_LONG: &str = "exit_long";
pub const EXIT_SHORT: &str = "exit_short";

/// One indicator column. NaN marks a missing `F64` value.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    F64(Vec<f64>),
    Bool(Vec<bool>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::F64(v) => v.len(),
            Column::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Candles of one pair/timeframe with named indicator columns aligned to them.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pair: String,
    timeframe: Timeframe,
    candles: Vec<Candle>,
    columns: BTreeMap<String, Column>,
}

impl IndicatorFrame {
    pub fn new(pair: impl Into<String>, timeframe: Timeframe, candles: Vec<Candle>) -> Self {
        Self {
            pair: pair.into(),
            timeframe,
            candles,
            columns: BTreeMap::new(),
        }
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn open(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.open).collect()
    }

    pub fn high(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn low(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    pub fn close(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn volume(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }

    pub fn typical_price(&self) -> Vec<f64> {
        self.candles.iter().map(Candle::typical_price).collect()
    }

    pub fn insert_f64(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        self.insert(name.into(), Column::F64(values))
    }

    pub fn insert_bool(&mut self, name: impl Into<String>, values: Vec<bool>) -> Result<()> {
        self.insert(name.into(), Column::Bool(values))
    }

    fn insert(&mut self, name: String, column: Column) -> Result<()> {
        if column.len() != self.len() {
            return Err(StrategyError::ColumnLength {
                name,
                expected: self.len(),
                actual: column.len(),
            });
        }
        self.columns.insert(name, column);
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn f64_column(&self, name: &str) -> Result<&[f64]> {
        match self.columns.get(name) {
            Some(Column::F64(v)) => Ok(v),
            Some(Column::Bool(_)) => Err(StrategyError::ColumnType {
                name: name.to_string(),
                expected: "f64",
            }),
            None => Err(StrategyError::MissingColumn(name.to_string())),
        }
    }

    pub fn bool_column(&self, name: &str) -> Result<&[bool]> {
        match self.columns.get(name) {
            Some(Column::Bool(v)) => Ok(v),
            Some(Column::F64(_)) => Err(StrategyError::ColumnType {
                name: name.to_string(),
                expected: "bool",
            }),
            None => Err(StrategyError::MissingColumn(name.to_string())),
        }
    }

    /// Set `name` true wherever `mask` is true. Creates the column (all false)
    /// if absent; repeated marks accumulate.
    pub fn mark(&mut self, name: &str, mask: &[bool]) -> Result<()> {
        if mask.len() != self.len() {
            return Err(StrategyError::ColumnLength {
                name: name.to_string(),
                expected: self.len(),
                actual: mask.len(),
            });
        }
        let rows = self.len();
        let column = self
            .columns
            .entry(name.to_string())
            .or_insert_with(|| Column::Bool(vec![false; rows]));
        match column {
            Column::Bool(values) => {
                for (value, &hit) in values.iter_mut().zip(mask) {
                    *value |= hit;
                }
                Ok(())
            }
            Column::F64(_) => Err(StrategyError::ColumnType {
                name: name.to_string(),
                expected: "bool",
            }),
        }
    }

    /// Whether bool column `name` is set on `row`. Absent columns read false.
    pub fn flag(&self, name: &str, row: usize) -> bool {
        matches!(self.columns.get(name), Some(Column::Bool(v)) if v.get(row).copied().unwrap_or(false))
    }

    /// Rows where bool column `name` is set.
    pub fn flagged_rows(&self, name: &str) -> Vec<usize> {
        match self.columns.get(name) {
            Some(Column::Bool(v)) => v
                .iter()
                .enumerate()
                .filter_map(|(i, &f)| f.then_some(i))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Copy an informative frame's candles and columns onto this frame as
    /// `{name}_{timeframe}`.
    ///
    /// An informative candle opened at `t` only becomes visible to base rows
    /// opened at or after `t + informative_tf - base_tf`, i.e. once it has
    /// closed. With `ffill`, each base row takes the latest visible
    /// informative row; otherwise only rows landing exactly on that instant
    /// get a value and the rest stay NaN / false.
    pub fn merge_informative(&mut self, informative: &IndicatorFrame, ffill: bool) -> Result<()> {
        let base_tf = self.timeframe;
        let inf_tf = informative.timeframe;
        if inf_tf < base_tf {
            return Err(StrategyError::Timeframe {
                base: base_tf.to_string(),
                informative: inf_tf.to_string(),
            });
        }
        let offset = inf_tf.duration() - base_tf.duration();

        // Informative row visible on each base row, if any.
        let mut source: Vec<Option<usize>> = Vec::with_capacity(self.len());
        let mut next = 0;
        for candle in &self.candles {
            while next < informative.len()
                && informative.candles[next].timestamp + offset <= candle.timestamp
            {
                next += 1;
            }
            let latest = next.checked_sub(1);
            let visible = latest.filter(|&j| {
                ffill || informative.candles[j].timestamp + offset == candle.timestamp
            });
            source.push(visible);
        }

        let suffix = format!("_{inf_tf}");
        let pick_f64 = |values: &[f64]| -> Vec<f64> {
            source
                .iter()
                .map(|s| s.map_or(f64::NAN, |j| values[j]))
                .collect()
        };

        let ohlcv = [
            ("open", informative.open()),
            ("high", informative.high()),
            ("low", informative.low()),
            ("close", informative.close()),
            ("volume", informative.volume()),
        ];
        for (name, values) in ohlcv {
            self.insert_f64(format!("{name}{suffix}"), pick_f64(&values))?;
        }

        for (name, column) in &informative.columns {
            let merged = match column {
                Column::F64(values) => Column::F64(pick_f64(values)),
                Column::Bool(values) => Column::Bool(
                    source
                        .iter()
                        .map(|s| s.is_some_and(|j| values[j]))
                        .collect(),
                ),
            };
            self.insert(format!("{name}{suffix}"), merged)?;
        }
        Ok(())
    }
}
