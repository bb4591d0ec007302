//! Rolling sum.
//!
//! Same trailing-window technique as the SMA without the division. Warmup:
//! first W-1 rows are NaN.

use crate::domain::column::Column;
use crate::domain::error::Error;
use crate::domain::indicator::roll_sum_field;
use crate::domain::timeseries::TimeSeries;
use std::collections::VecDeque;

/// Write `ROLL_SUM_{window}` over `col` into every row.
pub fn apply_roll_sum(series: &mut TimeSeries, window: usize, col: &str) -> Result<(), Error> {
    if series.is_empty() || window == 0 {
        return Ok(());
    }
    let col = Column::parse(col)?;
    let values = series.column_values(col);
    let name = roll_sum_field(window);

    let mut trailing: VecDeque<f64> = VecDeque::with_capacity(window + 1);
    let mut sum = 0.0;

    for (i, &v) in values.iter().enumerate() {
        trailing.push_back(v);
        sum += v;
        if trailing.len() > window {
            if let Some(old) = trailing.pop_front() {
                sum -= old;
            }
        }

        let out = if trailing.len() == window { sum } else { f64::NAN };
        series.get_mut(i)?.derived.insert(name.clone(), out);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Record;
    use approx::assert_relative_eq;

    fn make_series(volumes: &[f64]) -> TimeSeries {
        let mut ts = TimeSeries::new();
        for (i, &vol) in volumes.iter().enumerate() {
            ts.push(Record::new(
                format!("2024-01-{:02}", i + 1),
                1.0,
                1.0,
                1.0,
                1.0,
                1.0,
                vol,
            ));
        }
        ts
    }

    #[test]
    fn roll_sum_basic() {
        let mut ts = make_series(&[1.0, 2.0, 3.0, 4.0]);
        apply_roll_sum(&mut ts, 2, "volume").unwrap();

        assert!(ts.get(0).unwrap().derived_or_nan("ROLL_SUM_2").is_nan());
        assert_relative_eq!(ts.get(1).unwrap().derived_or_nan("ROLL_SUM_2"), 3.0);
        assert_relative_eq!(ts.get(2).unwrap().derived_or_nan("ROLL_SUM_2"), 5.0);
        assert_relative_eq!(ts.get(3).unwrap().derived_or_nan("ROLL_SUM_2"), 7.0);
    }

    #[test]
    fn roll_sum_full_window_equals_total() {
        let vols = [10.0, 20.0, 30.0];
        let mut ts = make_series(&vols);
        apply_roll_sum(&mut ts, 3, "volume").unwrap();
        assert_relative_eq!(ts.get(2).unwrap().derived_or_nan("ROLL_SUM_3"), 60.0);
    }

    #[test]
    fn roll_sum_window_zero_is_noop() {
        let mut ts = make_series(&[1.0]);
        apply_roll_sum(&mut ts, 0, "volume").unwrap();
        assert!(ts.iter().all(|r| r.derived.is_empty()));
    }

    #[test]
    fn roll_sum_unknown_column() {
        let mut ts = make_series(&[1.0]);
        assert!(matches!(
            apply_roll_sum(&mut ts, 1, "turnover"),
            Err(Error::UnknownColumn { .. })
        ));
    }
}
