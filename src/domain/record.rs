//! A single time-ordered OHLCV observation.

use std::collections::BTreeMap;

/// One row of a time series: timestamp, OHLCV prices, derived values and a
/// trading signal.
///
/// Derived values live in an open string-keyed map because callers mint new
/// field names at runtime from window parameters (`SMA_20`, `Z_14`, ...).
/// Once an indicator has run over a row, its key is always present; an
/// undefined value is stored as `f64::NAN`, never omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
    pub derived: BTreeMap<String, f64>,
    /// -1 short, 0 flat, +1 long.
    pub signal: i32,
}

impl Record {
    pub fn new(
        timestamp: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adj_close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            open,
            high,
            low,
            close,
            adj_close,
            volume,
            derived: BTreeMap::new(),
            signal: 0,
        }
    }

    /// Stored derived value, or NaN when the key is absent.
    pub fn derived_or_nan(&self, name: &str) -> f64 {
        self.derived.get(name).copied().unwrap_or(f64::NAN)
    }
}
