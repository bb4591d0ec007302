//! Bollinger band breakout.
//!
//! Bands sit `num_std` rolling standard deviations around the rolling mean.
//! A close above the upper band enters long, below the lower band enters
//! short, and a return inside the bands flattens an open position. Rows
//! where the bands are undefined emit 0; the carried position survives.

use crate::domain::column::Column;
use crate::domain::error::Error;
use crate::domain::indicator::{
    apply_roll_stats, field_present, roll_mean_field, roll_std_field,
};
use crate::domain::timeseries::TimeSeries;

/// Write the breakout signal over `col` into `out_field` and each row's
/// `signal`, computing rolling stats for `window` first if missing.
pub fn bollinger_breakout(
    series: &mut TimeSeries,
    window: usize,
    num_std: f64,
    col: &str,
    out_field: &str,
) -> Result<(), Error> {
    if series.is_empty() {
        return Ok(());
    }
    let col = Column::parse(col)?;

    let mean_name = roll_mean_field(window);
    let std_name = roll_std_field(window);
    if !field_present(series, &mean_name) || !field_present(series, &std_name) {
        apply_roll_stats(series, window, col.name())?;
    }

    let values = series.column_values(col);
    let means = series.derived_values(&mean_name);
    let stds = series.derived_values(&std_name);
    let mut position = 0i32;

    for i in 0..series.len() {
        let mean = means[i];
        let std = stds[i];
        let record = series.get_mut(i)?;

        if !mean.is_finite() || !std.is_finite() {
            record.derived.insert(out_field.to_string(), 0.0);
            record.signal = 0;
            continue;
        }

        let price = values[i];
        let upper = mean + num_std * std;
        let lower = mean - num_std * std;

        if price > upper {
            position = 1;
        } else if price < lower {
            position = -1;
        } else if position != 0 {
            // Back inside the bands.
            position = 0;
        }

        record.derived.insert(out_field.to_string(), f64::from(position));
        record.signal = position;
    }
    Ok(())
}
