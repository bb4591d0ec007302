//! Annualized rolling volatility.
//!
//! VOL(W) = ROLL_STD(W) * sqrt(periods_per_year). The rolling std is
//! materialized first when absent; a NaN std poisons the output.

use crate::domain::column::Column;
use crate::domain::error::Error;
use crate::domain::indicator::{
    apply_roll_stats, field_present, roll_std_field, volatility_field,
};
use crate::domain::timeseries::TimeSeries;

/// Trading periods in a year of daily bars.
pub const DAILY_PERIODS_PER_YEAR: f64 = 252.0;

/// Write `VOL_{window}` over `col` into every row, computing
/// `ROLL_STD_{window}` first if missing.
pub fn apply_volatility(
    series: &mut TimeSeries,
    window: usize,
    col: &str,
    periods_per_year: f64,
) -> Result<(), Error> {
    if series.is_empty() || window == 0 {
        return Ok(());
    }
    let col = Column::parse(col)?;

    let std_name = roll_std_field(window);
    if !field_present(series, &std_name) {
        apply_roll_stats(series, window, col.name())?;
    }

    let name = volatility_field(window);
    let factor = periods_per_year.sqrt();

    for record in series.iter_mut() {
        let std = record.derived_or_nan(&std_name);
        let vol = if std.is_finite() { std * factor } else { f64::NAN };
        record.derived.insert(name.clone(), vol);
    }
    Ok(())
}
