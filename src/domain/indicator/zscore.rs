//! Rolling z-score.
//!
//! z = (value - ROLL_MEAN_W) / ROLL_STD_W. The rolling stats are materialized
//! first when absent. NaN while the stats are warming up or the std is
//! effectively zero.

use crate::domain::column::Column;
use crate::domain::error::Error;
use crate::domain::indicator::{
    apply_roll_stats, field_present, roll_mean_field, roll_std_field, zscore_field, NEAR_ZERO,
};
use crate::domain::timeseries::TimeSeries;

/// Write `Z_{window}` over `col` into every row, computing
/// `ROLL_MEAN_{window}`/`ROLL_STD_{window}` first if missing.
pub fn apply_zscore(series: &mut TimeSeries, window: usize, col: &str) -> Result<(), Error> {
    if series.is_empty() || window == 0 {
        return Ok(());
    }
    let col = Column::parse(col)?;

    let mean_name = roll_mean_field(window);
    let std_name = roll_std_field(window);
    if !field_present(series, &mean_name) || !field_present(series, &std_name) {
        apply_roll_stats(series, window, col.name())?;
    }

    let name = zscore_field(window);
    let values = series.column_values(col);

    for (i, &v) in values.iter().enumerate() {
        let record = series.get_mut(i)?;
        let mean = record.derived_or_nan(&mean_name);
        let std = record.derived_or_nan(&std_name);

        let z = if mean.is_finite() && std.is_finite() && std > NEAR_ZERO {
            (v - mean) / std
        } else {
            f64::NAN
        };
        record.derived.insert(name.clone(), z);
    }
    Ok(())
}
