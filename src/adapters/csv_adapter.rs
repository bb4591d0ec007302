//! CSV data adapters.
//!
//! Expected input layout: `Date,Open,High,Low,Close,Adj Close,Volume` with a
//! header row. Unparseable numeric fields become NaN; with `drop_na` on
//! (the default) such rows are skipped entirely. Output repeats the OHLCV
//! columns, the signal, then every derived field observed anywhere in the
//! series, NaN rendered as the literal text `NaN`.

use crate::domain::error::Error;
use crate::domain::record::Record;
use crate::domain::timeseries::TimeSeries;
use crate::ports::data_port::{SeriesSink, SeriesSource};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::PathBuf;

/// Columns every input file must carry, in order.
const SOURCE_FIELDS: usize = 7;

pub struct CsvSource {
    path: PathBuf,
    drop_na: bool,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            drop_na: true,
            start_date: None,
            end_date: None,
        }
    }

    /// Keep rows with unparseable numeric fields as NaN instead of
    /// dropping them.
    pub fn keep_na(mut self) -> Self {
        self.drop_na = false;
        self
    }

    pub fn with_drop_na(mut self, drop_na: bool) -> Self {
        self.drop_na = drop_na;
        self
    }

    /// Skip rows dated outside `[start, end]`. Rows whose timestamp does
    /// not lead with a parseable `YYYY-MM-DD` are kept.
    pub fn with_date_range(
        mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    fn in_range(&self, timestamp: &str) -> bool {
        if self.start_date.is_none() && self.end_date.is_none() {
            return true;
        }
        let Some(date) = leading_date(timestamp) else {
            return true;
        };
        if self.start_date.is_some_and(|start| date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }
        true
    }
}

fn leading_date(timestamp: &str) -> Option<NaiveDate> {
    let prefix = timestamp.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn parse_field(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

impl SeriesSource for CsvSource {
    fn load(&self) -> Result<TimeSeries, Error> {
        let file = File::open(&self.path).map_err(|e| Error::Data {
            path: self.path.display().to_string(),
            reason: format!("failed to open: {e}"),
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut series = TimeSeries::new();
        for result in reader.records() {
            let row = result.map_err(|e| Error::Data {
                path: self.path.display().to_string(),
                reason: format!("CSV parse error: {e}"),
            })?;

            let timestamp = row.get(0).unwrap_or("").trim().to_string();
            if !self.in_range(&timestamp) {
                continue;
            }

            let record = Record::new(
                timestamp,
                parse_field(row.get(1)),
                parse_field(row.get(2)),
                parse_field(row.get(3)),
                parse_field(row.get(4)),
                parse_field(row.get(5)),
                parse_field(row.get(6)),
            );

            let complete = row.len() >= SOURCE_FIELDS
                && [
                    record.open,
                    record.high,
                    record.low,
                    record.close,
                    record.adj_close,
                    record.volume,
                ]
                .iter()
                .all(|v| v.is_finite());

            if !complete && self.drop_na {
                continue;
            }
            series.push(record);
        }
        Ok(series)
    }
}

pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Every derived field name observed anywhere in the series, sorted.
fn collect_derived_names(series: &TimeSeries) -> Vec<String> {
    let mut names = BTreeSet::new();
    for record in series {
        for name in record.derived.keys() {
            names.insert(name.clone());
        }
    }
    names.into_iter().collect()
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value}")
    }
}

impl SeriesSink for CsvSink {
    fn write(&self, series: &TimeSeries) -> Result<(), Error> {
        let file = File::create(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);

        let derived_names = collect_derived_names(series);
        let mut header = vec![
            "Date".to_string(),
            "Open".to_string(),
            "High".to_string(),
            "Low".to_string(),
            "Close".to_string(),
            "Adj Close".to_string(),
            "Volume".to_string(),
            "Signal".to_string(),
        ];
        header.extend(derived_names.iter().cloned());
        writer.write_record(&header)?;

        for record in series {
            let mut row = vec![
                record.timestamp.clone(),
                format_value(record.open),
                format_value(record.high),
                format_value(record.low),
                format_value(record.close),
                format_value(record.adj_close),
                format_value(record.volume),
                record.signal.to_string(),
            ];
            for name in &derived_names {
                row.push(format_value(record.derived_or_nan(name)));
            }
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Error::Io(io),
            other => Error::Data {
                path: String::new(),
                reason: format!("CSV error: {other:?}"),
            },
        }
    }
}
