//! Fast/slow SMA crossover.
//!
//! Golden cross (fast crosses above slow) enters long, death cross enters
//! short, and between crossings the previous signal is held. Both SMAs are
//! computed on close first when absent. Rows where either SMA is undefined
//! emit 0 without touching the held signal; the first row after warm-up has
//! no usable previous row, so it compares the SMA levels directly.

use crate::domain::error::Error;
use crate::domain::indicator::{apply_sma, field_present, sma_field};
use crate::domain::timeseries::TimeSeries;

/// Write the crossover signal for `fast_window`/`slow_window` SMAs into
/// `out_field` and each row's `signal`. No-op unless `fast_window < slow_window`.
pub fn sma_crossover(
    series: &mut TimeSeries,
    fast_window: usize,
    slow_window: usize,
    out_field: &str,
) -> Result<(), Error> {
    if series.is_empty() || fast_window >= slow_window {
        return Ok(());
    }

    let fast_name = sma_field(fast_window);
    let slow_name = sma_field(slow_window);
    if !field_present(series, &fast_name) {
        apply_sma(series, fast_window, "close")?;
    }
    if !field_present(series, &slow_name) {
        apply_sma(series, slow_window, "close")?;
    }

    let fast_vals = series.derived_values(&fast_name);
    let slow_vals = series.derived_values(&slow_name);
    let mut held = 0i32;

    for i in 0..series.len() {
        let fast = fast_vals[i];
        let slow = slow_vals[i];

        if !fast.is_finite() || !slow.is_finite() {
            // Undefined SMA: emit 0 but keep the held signal intact.
            let record = series.get_mut(i)?;
            record.derived.insert(out_field.to_string(), 0.0);
            record.signal = 0;
            continue;
        }

        let signal = if i == 0 {
            0
        } else {
            let prev_fast = fast_vals[i - 1];
            let prev_slow = slow_vals[i - 1];
            if prev_fast.is_finite() && prev_slow.is_finite() {
                if prev_fast <= prev_slow && fast > slow {
                    1
                } else if prev_fast >= prev_slow && fast < slow {
                    -1
                } else {
                    held
                }
            } else if fast > slow {
                // First row out of warm-up: a cross from neutral.
                1
            } else if fast < slow {
                -1
            } else {
                0
            }
        };

        held = signal;
        let record = series.get_mut(i)?;
        record.derived.insert(out_field.to_string(), f64::from(signal));
        record.signal = signal;
    }
    Ok(())
}
