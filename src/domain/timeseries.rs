//! In-memory time-series container.
//!
//! An ordered, index-addressable sequence of [`Record`]s. Rows are appended
//! in chronological order by the loader; the engine assumes, never verifies,
//! monotonic time and never reorders or deletes rows. Single-owner,
//! single-writer: one indicator or signal call mutates the series at a time.

use crate::domain::column::Column;
use crate::domain::error::Error;
use crate::domain::record::Record;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    rows: Vec<Record>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Append a record at the end of the series.
    pub fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Record, Error> {
        self.rows.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Record, Error> {
        let len = self.rows.len();
        self.rows
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Record> {
        self.rows.iter_mut()
    }

    /// Dense projection of one source column.
    pub fn column_values(&self, col: Column) -> Vec<f64> {
        self.rows.iter().map(|r| col.value(r)).collect()
    }

    /// Same as [`column_values`](Self::column_values), resolving the column
    /// name through [`Column::parse`].
    pub fn column(&self, name: &str) -> Result<Vec<f64>, Error> {
        let col = Column::parse(name)?;
        Ok(self.column_values(col))
    }

    /// Dense projection of one derived field; missing keys project as NaN.
    pub fn derived_values(&self, name: &str) -> Vec<f64> {
        self.rows.iter().map(|r| r.derived_or_nan(name)).collect()
    }

    /// Capacity hint for the loader, no semantic effect.
    pub fn reserve(&mut self, additional: usize) {
        self.rows.reserve(additional);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series() -> TimeSeries {
        let mut ts = TimeSeries::new();
        for (i, close) in [100.0, 101.0, 102.0].iter().enumerate() {
            ts.push(Record::new(
                format!("2024-01-{:02}", i + 1),
                close - 1.0,
                close + 1.0,
                close - 2.0,
                *close,
                *close,
                1_000.0 + i as f64,
            ));
        }
        ts
    }

    #[test]
    fn push_and_len() {
        let ts = sample_series();
        assert_eq!(ts.len(), 3);
        assert!(!ts.is_empty());
    }

    #[test]
    fn get_in_bounds() {
        let ts = sample_series();
        assert_eq!(ts.get(1).unwrap().timestamp, "2024-01-02");
    }

    #[test]
    fn get_out_of_bounds() {
        let ts = sample_series();
        let err = ts.get(3).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn get_mut_out_of_bounds() {
        let mut ts = sample_series();
        assert!(matches!(
            ts.get_mut(10),
            Err(Error::IndexOutOfRange { index: 10, len: 3 })
        ));
    }

    #[test]
    fn column_values_close() {
        let ts = sample_series();
        assert_eq!(ts.column_values(Column::Close), vec![100.0, 101.0, 102.0]);
    }

    #[test]
    fn column_by_name_volume() {
        let ts = sample_series();
        assert_eq!(ts.column("volume").unwrap(), vec![1000.0, 1001.0, 1002.0]);
    }

    #[test]
    fn column_by_name_unknown() {
        let ts = sample_series();
        assert!(matches!(
            ts.column("typical"),
            Err(Error::UnknownColumn { .. })
        ));
    }

    #[test]
    fn derived_values_missing_key_are_nan() {
        let ts = sample_series();
        let vals = ts.derived_values("SMA_2");
        assert_eq!(vals.len(), 3);
        assert!(vals.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn clear_empties_series() {
        let mut ts = sample_series();
        ts.clear();
        assert!(ts.is_empty());
    }

    #[test]
    fn clear_does_not_affect_clones() {
        let ts = sample_series();
        let mut other = ts.clone();
        other.clear();
        assert_eq!(ts.len(), 3);
        assert!(other.is_empty());
    }

    #[test]
    fn reserve_is_semantically_inert() {
        let mut ts = sample_series();
        ts.reserve(1024);
        assert_eq!(ts.len(), 3);
        assert_eq!(ts, sample_series());
    }
}
