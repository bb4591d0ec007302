//! Exponential moving average.
//!
//! alpha = 2/(W+1); the first observed value seeds the average and every
//! later row updates via ema = alpha*v + (1-alpha)*ema. Unlike the windowed
//! indicators there is no warmup: EMA is defined from row 0 onward.

use crate::domain::column::Column;
use crate::domain::error::Error;
use crate::domain::indicator::ema_field;
use crate::domain::timeseries::TimeSeries;

/// Write `EMA_{window}` over `col` into every row.
pub fn apply_ema(series: &mut TimeSeries, window: usize, col: &str) -> Result<(), Error> {
    if series.is_empty() || window == 0 {
        return Ok(());
    }
    let col = Column::parse(col)?;
    let values = series.column_values(col);
    let name = ema_field(window);
    let alpha = 2.0 / (window as f64 + 1.0);

    let mut ema = 0.0;
    let mut seeded = false;

    for (i, &v) in values.iter().enumerate() {
        if seeded {
            ema = alpha * v + (1.0 - alpha) * ema;
        } else {
            ema = v;
            seeded = true;
        }
        series.get_mut(i)?.derived.insert(name.clone(), ema);
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
    fn ema_defined_from_row_zero() {
        let mut ts = make_series(&[10.0, 20.0, 30.0]);
        apply_ema(&mut ts, 3, "close").unwrap();
        assert_relative_eq!(ts.get(0).unwrap().derived_or_nan("EMA_3"), 10.0);
    }

    #[test]
    fn ema_recursive_update() {
        let mut ts = make_series(&[10.0, 20.0, 30.0]);
        apply_ema(&mut ts, 3, "close").unwrap();

        // alpha = 2/4 = 0.5
        assert_relative_eq!(ts.get(1).unwrap().derived_or_nan("EMA_3"), 15.0);
        assert_relative_eq!(ts.get(2).unwrap().derived_or_nan("EMA_3"), 22.5);
    }

    #[test]
    fn ema_constant_series_stays_constant() {
        let mut ts = make_series(&[42.0; 6]);
        apply_ema(&mut ts, 4, "close").unwrap();
        for r in ts.iter() {
            assert_relative_eq!(r.derived_or_nan("EMA_4"), 42.0);
        }
    }

    #[test]
    fn ema_window_one_tracks_input() {
        let closes = [3.0, 9.0, 27.0];
        let mut ts = make_series(&closes);
        apply_ema(&mut ts, 1, "close").unwrap();
        for (i, &c) in closes.iter().enumerate() {
            assert_relative_eq!(ts.get(i).unwrap().derived_or_nan("EMA_1"), c);
        }
    }

    #[test]
    fn ema_window_zero_is_noop() {
        let mut ts = make_series(&[1.0, 2.0]);
        apply_ema(&mut ts, 0, "close").unwrap();
        assert!(ts.iter().all(|r| r.derived.is_empty()));
    }

    #[test]
    fn ema_never_nan() {
        let mut ts = make_series(&[5.0, 6.0, 7.0, 8.0]);
        apply_ema(&mut ts, 10, "close").unwrap();
        assert!(ts.iter().all(|r| r.derived_or_nan("EMA_10").is_finite()));
    }
}
