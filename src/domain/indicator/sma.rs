//! Simple moving average.
//!
//! SMA(W)[i] = mean(v[i-W+1..=i]), maintained with a trailing window and a
//! running sum, O(1) amortized per row. Warmup: first W-1 rows are NaN.

use crate::domain::column::Column;
use crate::domain::error::Error;
use crate::domain::indicator::sma_field;
use crate::domain::timeseries::TimeSeries;
use std::collections::VecDeque;

/// Write `SMA_{window}` over `col` into every row.
pub fn apply_sma(series: &mut TimeSeries, window: usize, col: &str) -> Result<(), Error> {
    if series.is_empty() || window == 0 {
        return Ok(());
    }
    let col = Column::parse(col)?;
    let values = series.column_values(col);
    let name = sma_field(window);

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

        let out = if trailing.len() == window {
            sum / window as f64
        } else {
            f64::NAN
        };
        series.get_mut(i)?.derived.insert(name.clone(), out);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Record;
    use approx::assert_relative_eq;

    fn make_series(closes: &[f64]) -> TimeSeries {
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

    #[test]
    fn sma_warmup_then_values() {
        let mut ts = make_series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        apply_sma(&mut ts, 3, "close").unwrap();

        assert!(ts.get(0).unwrap().derived_or_nan("SMA_3").is_nan());
        assert!(ts.get(1).unwrap().derived_or_nan("SMA_3").is_nan());
        assert_relative_eq!(ts.get(2).unwrap().derived_or_nan("SMA_3"), 2.0);
        assert_relative_eq!(ts.get(9).unwrap().derived_or_nan("SMA_3"), 9.0);
    }

    #[test]
    fn sma_matches_naive_mean() {
        let closes = [3.5, 7.25, 1.0, 9.5, 4.75, 2.0, 8.125];
        let mut ts = make_series(&closes);
        apply_sma(&mut ts, 4, "close").unwrap();

        for i in 3..closes.len() {
            let naive: f64 = closes[i - 3..=i].iter().sum::<f64>() / 4.0;
            assert_relative_eq!(
                ts.get(i).unwrap().derived_or_nan("SMA_4"),
                naive,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn sma_window_larger_than_series_is_all_nan() {
        let mut ts = make_series(&[1.0, 2.0, 3.0]);
        apply_sma(&mut ts, 5, "close").unwrap();
        for r in ts.iter() {
            assert!(r.derived_or_nan("SMA_5").is_nan());
        }
    }

    #[test]
    fn sma_window_zero_is_noop() {
        let mut ts = make_series(&[1.0, 2.0]);
        apply_sma(&mut ts, 0, "close").unwrap();
        assert!(ts.iter().all(|r| r.derived.is_empty()));
    }

    #[test]
    fn sma_empty_series_is_noop() {
        let mut ts = TimeSeries::new();
        apply_sma(&mut ts, 3, "close").unwrap();
        assert!(ts.is_empty());
    }

    #[test]
    fn sma_unknown_column() {
        let mut ts = make_series(&[1.0, 2.0]);
        assert!(matches!(
            apply_sma(&mut ts, 2, "median"),
            Err(Error::UnknownColumn { .. })
        ));
    }

    #[test]
    fn sma_on_volume_column() {
        let mut ts = make_series(&[1.0, 2.0, 3.0]);
        apply_sma(&mut ts, 2, "volume").unwrap();
        assert_relative_eq!(ts.get(1).unwrap().derived_or_nan("SMA_2"), 1_000.0);
    }

    #[test]
    fn sma_window_one_equals_input() {
        let closes = [4.0, 8.0, 15.0];
        let mut ts = make_series(&closes);
        apply_sma(&mut ts, 1, "close").unwrap();
        for (i, &c) in closes.iter().enumerate() {
            assert_relative_eq!(ts.get(i).unwrap().derived_or_nan("SMA_1"), c);
        }
    }
}
