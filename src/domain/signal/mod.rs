//! Trading-signal engine.
//!
//! Each strategy scans the series once, left to right, and writes a discrete
//! position per row into both a named derived field (as f64, for
//! traceability in the output) and the row's `signal` attribute (the
//! canonical decision). Carried state (previous signal, current position)
//! is local to one invocation and never stored on a record, so repeated
//! calls with different parameters stay composable.
//!
//! Malformed configuration (fast >= slow, empty or too-short series) is a
//! silent no-op: callers validate upstream (see
//! [`pipeline`](crate::domain::pipeline)). Unknown columns propagate
//! [`Error::UnknownColumn`](crate::domain::error::Error::UnknownColumn).

pub mod sma_crossover;
pub mod zscore_reversion;
pub mod momentum;
pub mod bollinger;

pub use bollinger::bollinger_breakout;
pub use momentum::momentum;
pub use sma_crossover::sma_crossover;
pub use zscore_reversion::zscore_reversion;

/// Default output field names, mirrored by the CLI pipeline.
pub const SMA_CROSSOVER_FIELD: &str = "signal_sma";
pub const ZSCORE_FIELD: &str = "signal_z";
pub const MOMENTUM_FIELD: &str = "signal_momentum";
pub const BOLLINGER_FIELD: &str = "signal_bb";
