//! Rolling mean and population standard deviation.
//!
//! Running sum and sum-of-squares over the trailing window:
//! mean = sum/W, variance = sumsq/W - mean^2, std = sqrt(max(variance, 0)).
//! The clamp keeps floating-point cancellation on near-constant windows from
//! turning into a NaN std. Warmup: first W-1 rows are NaN.

use crate::domain::column::Column;
use crate::domain::error::Error;
use crate::domain::indicator::{roll_mean_field, roll_std_field};
use crate::domain::timeseries::TimeSeries;
use std::collections::VecDeque;

/// Write `ROLL_MEAN_{window}` and `ROLL_STD_{window}` over `col` into every row.
pub fn apply_roll_stats(series: &mut TimeSeries, window: usize, col: &str) -> Result<(), Error> {
    if series.is_empty() || window == 0 {
        return Ok(());
    }
    let col = Column::parse(col)?;
    let values = series.column_values(col);
    let mean_name = roll_mean_field(window);
    let std_name = roll_std_field(window);

    let mut trailing: VecDeque<f64> = VecDeque::with_capacity(window + 1);
    let mut sum = 0.0;
    let mut sumsq = 0.0;

    for (i, &v) in values.iter().enumerate() {
        trailing.push_back(v);
        sum += v;
        sumsq += v * v;
        if trailing.len() > window {
            if let Some(old) = trailing.pop_front() {
                sum -= old;
                sumsq -= old * old;
            }
        }

        let (mean, std) = if trailing.len() == window {
            let mean = sum / window as f64;
            let variance = sumsq / window as f64 - mean * mean;
            (mean, variance.max(0.0).sqrt())
        } else {
            (f64::NAN, f64::NAN)
        };

        let record = series.get_mut(i)?;
        record.derived.insert(mean_name.clone(), mean);
        record.derived.insert(std_name.clone(), std);
    }
    Ok(())
}
