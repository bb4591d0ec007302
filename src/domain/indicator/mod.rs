//! Rolling indicator engine.
//!
//! Each function scans the series once, left to right, and writes its named
//! field(s) into every row's derived map. Warm-up rows get an explicit NaN
//! so key presence stays reliable for downstream lookups. Empty series or a
//! zero window is a silent no-op; unknown columns propagate
//! [`Error::UnknownColumn`](crate::domain::error::Error::UnknownColumn).
//!
//! Derived-field names are part of the contract: downstream consumers
//! reconstruct them from the same window parameter, so every name is minted
//! by the `*_field` constructors below.

pub mod sma;
pub mod roll_stats;
pub mod zscore;
pub mod ema;
pub mod roll_sum;
pub mod volatility;

pub use ema::apply_ema;
pub use roll_stats::apply_roll_stats;
pub use roll_sum::apply_roll_sum;
pub use sma::apply_sma;
pub use volatility::apply_volatility;
pub use zscore::apply_zscore;

use crate::domain::timeseries::TimeSeries;

pub fn sma_field(window: usize) -> String {
    format!("SMA_{window}")
}

pub fn roll_mean_field(window: usize) -> String {
    format!("ROLL_MEAN_{window}")
}

pub fn roll_std_field(window: usize) -> String {
    format!("ROLL_STD_{window}")
}

pub fn zscore_field(window: usize) -> String {
    format!("Z_{window}")
}

pub fn ema_field(window: usize) -> String {
    format!("EMA_{window}")
}

pub fn roll_sum_field(window: usize) -> String {
    format!("ROLL_SUM_{window}")
}

pub fn volatility_field(window: usize) -> String {
    format!("VOL_{window}")
}

/// Near-zero threshold shared by the z-score and momentum denominators.
pub(crate) const NEAR_ZERO: f64 = 1e-10;

/// Dependency check for lazy materialization: a field counts as computed
/// only when every row carries the key. Checking a single row would accept
/// a partially-populated series.
pub(crate) fn field_present(series: &TimeSeries, name: &str) -> bool {
    !series.is_empty() && series.iter().all(|r| r.derived.contains_key(name))
}
