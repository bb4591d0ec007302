//! Rate-of-change momentum.
//!
//! m(i) = (v[i] - v[i-W]) / v[i-W]; above `upper` goes long, below `lower`
//! goes short, otherwise flat. Stateless: no position carries across rows.
//! Rows without W bars of history are flat, and a near-zero denominator
//! (|v[i-W]| <= 1e-10) is flat rather than an overflow.

use crate::domain::column::Column;
use crate::domain::error::Error;
use crate::domain::indicator::NEAR_ZERO;
use crate::domain::timeseries::TimeSeries;

/// Write the momentum signal over `col` into `out_field` and each row's
/// `signal`. No-op when the series has no more than `window` rows.
pub fn momentum(
    series: &mut TimeSeries,
    window: usize,
    upper: f64,
    lower: f64,
    col: &str,
    out_field: &str,
) -> Result<(), Error> {
    if series.len() <= window {
        return Ok(());
    }
    let col = Column::parse(col)?;
    let values = series.column_values(col);

    for i in 0..series.len() {
        let signal = if i < window {
            0
        } else {
            let current = values[i];
            let past = values[i - window];
            if past.abs() <= NEAR_ZERO || !past.is_finite() || !current.is_finite() {
                0
            } else {
                let m = (current - past) / past;
                if m > upper {
                    1
                } else if m < lower {
                    -1
                } else {
                    0
                }
            }
        };

        let record = series.get_mut(i)?;
        record.derived.insert(out_field.to_string(), f64::from(signal));
        record.signal = signal;
    }
    Ok(())
}
