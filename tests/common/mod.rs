#![allow(dead_code)]

use quantsig::domain::record::Record;
use quantsig::domain::timeseries::TimeSeries;
use std::path::{Path, PathBuf};

/// Series where every price column tracks `closes` and volume is constant.
pub fn make_series(closes: &[f64]) -> TimeSeries {
    let mut ts = TimeSeries::new();
    for (i, &close) in closes.iter().enumerate() {
        ts.push(Record::new(
            format!("2024-01-{:02}", i + 1),
            close,
            close,
            close,
            close,
            close,
            1_000.0,
        ));
    }
    ts
}

/// CSV text in the expected input layout for the given closes.
pub fn csv_content(closes: &[f64]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for (i, &close) in closes.iter().enumerate() {
        out.push_str(&format!(
            "2024-{:02}-{:02},{c},{c},{c},{c},{c},1000\n",
            1 + i / 28,
            1 + i % 28,
            c = close
        ));
    }
    out
}

pub fn write_csv(dir: &Path, name: &str, closes: &[f64]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, csv_content(closes)).unwrap();
    path
}

pub fn signals(series: &TimeSeries) -> Vec<i32> {
    series.iter().map(|r| r.signal).collect()
}

pub fn derived(series: &TimeSeries, name: &str) -> Vec<f64> {
    series.iter().map(|r| r.derived_or_nan(name)).collect()
}
