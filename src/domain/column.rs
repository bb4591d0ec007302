//! Closed enumeration of source columns.
//!
//! Every string-keyed column lookup in the crate resolves through
//! [`Column::parse`]; anything outside the closed set is a configuration
//! error, not a data error.

use crate::domain::error::Error;
use crate::domain::record::Record;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::AdjClose,
        Column::Volume,
    ];

    /// Resolve a column identifier, failing with [`Error::UnknownColumn`]
    /// for anything outside the closed set.
    pub fn parse(name: &str) -> Result<Self, Error> {
        match name {
            "open" => Ok(Column::Open),
            "high" => Ok(Column::High),
            "low" => Ok(Column::Low),
            "close" => Ok(Column::Close),
            "adj_close" => Ok(Column::AdjClose),
            "volume" => Ok(Column::Volume),
            _ => Err(Error::UnknownColumn { name: name.into() }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::Open => "open",
            Column::High => "high",
            Column::Low => "low",
            Column::Close => "close",
            Column::AdjClose => "adj_close",
            Column::Volume => "volume",
        }
    }

    /// Project this column out of a record.
    pub fn value(self, record: &Record) -> f64 {
        match self {
            Column::Open => record.open,
            Column::High => record.high,
            Column::Low => record.low,
            Column::Close => record.close,
            Column::AdjClose => record.adj_close,
            Column::Volume => record.volume,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::parse(s)
    }
}
