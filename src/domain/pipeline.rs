//! Pipeline configuration and validation.
//!
//! A `PipelineConfig` describes one end-to-end run: where the series comes
//! from, which indicators to attach, which signal strategies to run, where
//! the result goes. The engine itself degrades malformed parameters to
//! silent no-ops, so validation here is the caller's chance to catch them
//! as errors before anything runs.

use crate::domain::column::Column;
use crate::domain::error::Error;
use chrono::NaiveDate;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct SmaCrossoverParams {
    pub fast_window: usize,
    pub slow_window: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZscoreParams {
    pub window: usize,
    pub entry_z: f64,
    pub exit_z: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumParams {
    pub window: usize,
    pub upper: f64,
    pub lower: f64,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerParams {
    pub window: usize,
    pub num_std: f64,
    pub column: String,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub drop_na: bool,
    pub binary_output: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Source column for the price indicators.
    pub column: String,
    pub sma_windows: Vec<usize>,
    pub ema_windows: Vec<usize>,
    /// Rolling mean/std window; z-score rides on the same window.
    pub roll_window: Option<usize>,
    pub roll_sum_windows: Vec<usize>,
    pub roll_sum_column: String,
    pub volatility_window: Option<usize>,
    pub periods_per_year: f64,
    pub sma_signal: Option<SmaCrossoverParams>,
    pub zscore_signal: Option<ZscoreParams>,
    pub momentum_signal: Option<MomentumParams>,
    pub bollinger_signal: Option<BollingerParams>,
}

fn invalid(key: &str, reason: impl Into<String>) -> Error {
    Error::ConfigInvalid {
        section: "signals".into(),
        key: key.into(),
        reason: reason.into(),
    }
}

fn check_windows(section: &str, key: &str, windows: &[usize]) -> Result<(), Error> {
    if windows.iter().any(|&w| w == 0) {
        return Err(Error::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: "window must be positive".into(),
        });
    }
    Ok(())
}

/// Reject configurations the engine would otherwise silently ignore.
pub fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), Error> {
    Column::parse(&config.column)?;
    Column::parse(&config.roll_sum_column)?;

    check_windows("indicators", "sma_windows", &config.sma_windows)?;
    check_windows("indicators", "ema_windows", &config.ema_windows)?;
    check_windows("indicators", "roll_sum_windows", &config.roll_sum_windows)?;
    if let Some(w) = config.roll_window {
        check_windows("indicators", "roll_window", &[w])?;
    }
    if let Some(w) = config.volatility_window {
        check_windows("indicators", "volatility_window", &[w])?;
    }
    if !(config.periods_per_year > 0.0) {
        return Err(Error::ConfigInvalid {
            section: "indicators".into(),
            key: "periods_per_year".into(),
            reason: "must be positive".into(),
        });
    }

    if let (Some(start), Some(end)) = (config.start_date, config.end_date) {
        if start > end {
            return Err(Error::ConfigInvalid {
                section: "data".into(),
                key: "start_date".into(),
                reason: format!("start_date {start} is after end_date {end}"),
            });
        }
    }

    if let Some(ref params) = config.sma_signal {
        if params.fast_window == 0 {
            return Err(invalid("fast_window", "window must be positive"));
        }
        if params.fast_window >= params.slow_window {
            return Err(invalid(
                "fast_window",
                format!(
                    "fast window {} must be smaller than slow window {}",
                    params.fast_window, params.slow_window
                ),
            ));
        }
    }

    if let Some(ref params) = config.zscore_signal {
        if params.window == 0 {
            return Err(invalid("zscore_window", "window must be positive"));
        }
        if params.entry_z <= params.exit_z {
            return Err(invalid(
                "entry_z",
                format!(
                    "entry threshold {} must exceed exit threshold {}",
                    params.entry_z, params.exit_z
                ),
            ));
        }
    }

    if let Some(ref params) = config.momentum_signal {
        if params.window == 0 {
            return Err(invalid("momentum_window", "window must be positive"));
        }
        if params.upper <= params.lower {
            return Err(invalid(
                "momentum_upper",
                format!(
                    "upper threshold {} must exceed lower threshold {}",
                    params.upper, params.lower
                ),
            ));
        }
        Column::parse(&params.column)?;
    }

    if let Some(ref params) = config.bollinger_signal {
        if params.window == 0 {
            return Err(invalid("bollinger_window", "window must be positive"));
        }
        if !(params.num_std > 0.0) {
            return Err(invalid("bollinger_std", "band width must be positive"));
        }
        Column::parse(&params.column)?;
    }

    Ok(())
}
