//! Z-score mean reversion.
//!
//! Enter long below -entry_z, enter short above +entry_z, flatten once |z|
//! falls inside the exit band. Between exit_z and entry_z the position is
//! held (hysteresis). The z-score is computed on close first when absent.
//! An undefined z emits 0 for that row only; the carried position survives.

use crate::domain::error::Error;
use crate::domain::indicator::{apply_zscore, field_present, zscore_field};
use crate::domain::timeseries::TimeSeries;

/// Write the mean-reversion signal for `Z_{window}` into `out_field` and
/// each row's `signal`. Typical thresholds: entry_z = 2.0, exit_z = 0.5.
pub fn zscore_reversion(
    series: &mut TimeSeries,
    window: usize,
    entry_z: f64,
    exit_z: f64,
    out_field: &str,
) -> Result<(), Error> {
    if series.is_empty() {
        return Ok(());
    }

    let z_name = zscore_field(window);
    if !field_present(series, &z_name) {
        apply_zscore(series, window, "close")?;
    }

    let z_vals = series.derived_values(&z_name);
    let mut position = 0i32;

    for (i, &z) in z_vals.iter().enumerate() {
        let record = series.get_mut(i)?;

        if !z.is_finite() {
            record.derived.insert(out_field.to_string(), 0.0);
            record.signal = 0;
            continue;
        }

        if z < -entry_z {
            position = 1;
        } else if z > entry_z {
            position = -1;
        } else if z.abs() < exit_z && position != 0 {
            position = 0;
        }

        record.derived.insert(out_field.to_string(), f64::from(position));
        record.signal = position;
    }
    Ok(())
}
