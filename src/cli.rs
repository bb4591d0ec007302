//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::binary_adapter::{BinarySink, BinarySource};
use crate::adapters::csv_adapter::{CsvSink, CsvSource};
use crate::adapters::file_config_adapter::IniConfig;
use crate::domain::column::Column;
use crate::domain::error::Error;
use crate::domain::indicator::{
    apply_ema, apply_roll_stats, apply_roll_sum, apply_sma, apply_volatility, apply_zscore,
};
use crate::domain::pipeline::{
    validate_pipeline_config, BollingerParams, MomentumParams, PipelineConfig,
    SmaCrossoverParams, ZscoreParams,
};
use crate::domain::signal::{
    bollinger_breakout, momentum, sma_crossover, zscore_reversion, BOLLINGER_FIELD,
    MOMENTUM_FIELD, SMA_CROSSOVER_FIELD, ZSCORE_FIELD,
};
use crate::domain::timeseries::TimeSeries;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{SeriesSink, SeriesSource};

#[derive(Parser, Debug)]
#[command(name = "quantsig", about = "Rolling indicator and trading-signal processor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the indicator/signal pipeline described by a config file
    Process {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the configured input file
        #[arg(long)]
        input: Option<PathBuf>,
        /// Override the configured output file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also write a binary copy next to the CSV output
        #[arg(long)]
        binary: bool,
    },
    /// Validate a pipeline configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Summarize an input file
    Info {
        #[arg(long)]
        input: PathBuf,
    },
    /// Convert between the CSV and binary formats
    Convert {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Output format: csv or binary
        #[arg(long)]
        to: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Process {
            config,
            input,
            output,
            binary,
        } => run_process(&config, input.as_deref(), output.as_deref(), binary),
        Command::Validate { config } => run_validate(&config),
        Command::Info { input } => run_info(&input),
        Command::Convert { input, output, to } => run_convert(&input, &output, &to),
    }
}

pub fn load_config(path: &Path) -> Result<IniConfig, ExitCode> {
    IniConfig::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn parse_window_list(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Vec<usize>, Error> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>().map_err(|_| Error::ConfigInvalid {
                section: section.into(),
                key: key.into(),
                reason: format!("expected a comma-separated list of integers, got '{raw}'"),
            })
        })
        .collect()
}

fn parse_date_key(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, Error> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|_| Error::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: format!("expected YYYY-MM-DD, got '{raw}'"),
        })
}

fn require_string(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, Error> {
    config
        .get_string(section, key)
        .ok_or_else(|| Error::ConfigMissing {
            section: section.into(),
            key: key.into(),
        })
}

fn require_usize(config: &dyn ConfigPort, section: &str, key: &str) -> Result<usize, Error> {
    let raw = require_string(config, section, key)?;
    raw.trim().parse().map_err(|_| Error::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: format!("expected a non-negative integer, got '{raw}'"),
    })
}

fn optional_window(config: &dyn ConfigPort, section: &str, key: &str) -> Option<usize> {
    match config.get_int(section, key, 0) {
        n if n > 0 => Some(n as usize),
        _ => None,
    }
}

/// Build a [`PipelineConfig`] from an INI-backed [`ConfigPort`].
pub fn build_pipeline_config(config: &dyn ConfigPort) -> Result<PipelineConfig, Error> {
    let input = PathBuf::from(require_string(config, "data", "input")?);
    let output = PathBuf::from(require_string(config, "data", "output")?);

    let sma_signal = if config.get_bool("signals", "sma_crossover", false) {
        Some(SmaCrossoverParams {
            fast_window: require_usize(config, "signals", "fast_window")?,
            slow_window: require_usize(config, "signals", "slow_window")?,
        })
    } else {
        None
    };

    let zscore_signal = if config.get_bool("signals", "zscore", false) {
        Some(ZscoreParams {
            window: require_usize(config, "signals", "zscore_window")?,
            entry_z: config.get_f64("signals", "entry_z", 2.0),
            exit_z: config.get_f64("signals", "exit_z", 0.5),
        })
    } else {
        None
    };

    let momentum_signal = if config.get_bool("signals", "momentum", false) {
        Some(MomentumParams {
            window: require_usize(config, "signals", "momentum_window")?,
            upper: config.get_f64("signals", "momentum_upper", 0.05),
            lower: config.get_f64("signals", "momentum_lower", -0.05),
            column: config
                .get_string("signals", "momentum_column")
                .unwrap_or_else(|| "close".into()),
        })
    } else {
        None
    };

    let bollinger_signal = if config.get_bool("signals", "bollinger", false) {
        Some(BollingerParams {
            window: require_usize(config, "signals", "bollinger_window")?,
            num_std: config.get_f64("signals", "bollinger_std", 2.0),
            column: config
                .get_string("signals", "bollinger_column")
                .unwrap_or_else(|| "close".into()),
        })
    } else {
        None
    };

    Ok(PipelineConfig {
        input,
        output,
        drop_na: config.get_bool("data", "drop_na", true),
        binary_output: config.get_bool("data", "binary_output", false),
        start_date: parse_date_key(config, "data", "start_date")?,
        end_date: parse_date_key(config, "data", "end_date")?,
        column: config
            .get_string("indicators", "column")
            .unwrap_or_else(|| "close".into()),
        sma_windows: parse_window_list(config, "indicators", "sma_windows")?,
        ema_windows: parse_window_list(config, "indicators", "ema_windows")?,
        roll_window: optional_window(config, "indicators", "roll_window"),
        roll_sum_windows: parse_window_list(config, "indicators", "roll_sum_windows")?,
        roll_sum_column: config
            .get_string("indicators", "roll_sum_column")
            .unwrap_or_else(|| "volume".into()),
        volatility_window: optional_window(config, "indicators", "volatility_window"),
        periods_per_year: config.get_f64("indicators", "periods_per_year", 252.0),
        sma_signal,
        zscore_signal,
        momentum_signal,
        bollinger_signal,
    })
}

/// Apply every configured indicator, then every configured signal, to a
/// loaded series. Signals run last so their lazy dependencies can reuse the
/// indicator pass; each signal keeps its own derived mirror while the last
/// one wins on the `signal` attribute.
pub fn apply_pipeline(series: &mut TimeSeries, config: &PipelineConfig) -> Result<(), Error> {
    for &window in &config.sma_windows {
        eprintln!("Computing SMA({window}) on {}", config.column);
        apply_sma(series, window, &config.column)?;
    }
    for &window in &config.ema_windows {
        eprintln!("Computing EMA({window}) on {}", config.column);
        apply_ema(series, window, &config.column)?;
    }
    if let Some(window) = config.roll_window {
        eprintln!("Computing rolling mean/std/z-score({window}) on {}", config.column);
        apply_roll_stats(series, window, &config.column)?;
        apply_zscore(series, window, &config.column)?;
    }
    for &window in &config.roll_sum_windows {
        eprintln!("Computing rolling sum({window}) on {}", config.roll_sum_column);
        apply_roll_sum(series, window, &config.roll_sum_column)?;
    }
    if let Some(window) = config.volatility_window {
        eprintln!("Computing volatility({window}) on {}", config.column);
        apply_volatility(series, window, &config.column, config.periods_per_year)?;
    }

    if let Some(ref params) = config.sma_signal {
        eprintln!(
            "Generating SMA crossover signal (fast={}, slow={})",
            params.fast_window, params.slow_window
        );
        sma_crossover(
            series,
            params.fast_window,
            params.slow_window,
            SMA_CROSSOVER_FIELD,
        )?;
    }
    if let Some(ref params) = config.zscore_signal {
        eprintln!(
            "Generating z-score reversion signal (entry={}, exit={})",
            params.entry_z, params.exit_z
        );
        zscore_reversion(series, params.window, params.entry_z, params.exit_z, ZSCORE_FIELD)?;
    }
    if let Some(ref params) = config.momentum_signal {
        eprintln!(
            "Generating momentum signal (window={}, thresholds={}/{})",
            params.window, params.upper, params.lower
        );
        momentum(
            series,
            params.window,
            params.upper,
            params.lower,
            &params.column,
            MOMENTUM_FIELD,
        )?;
    }
    if let Some(ref params) = config.bollinger_signal {
        eprintln!(
            "Generating Bollinger breakout signal (window={}, k={})",
            params.window, params.num_std
        );
        bollinger_breakout(
            series,
            params.window,
            params.num_std,
            &params.column,
            BOLLINGER_FIELD,
        )?;
    }
    Ok(())
}

/// Full pipeline: load, compute, write. Returns the processed series so
/// callers (and tests) can inspect it.
pub fn run_pipeline(config: &PipelineConfig) -> Result<TimeSeries, Error> {
    eprintln!("Loading data from {}", config.input.display());
    let source = CsvSource::new(&config.input)
        .with_drop_na(config.drop_na)
        .with_date_range(config.start_date, config.end_date);
    let mut series = source.load()?;
    eprintln!("Loaded {} records", series.len());

    apply_pipeline(&mut series, config)?;

    eprintln!("Writing output to {}", config.output.display());
    CsvSink::new(&config.output).write(&series)?;

    if config.binary_output {
        let binary_path = binary_sibling(&config.output);
        eprintln!("Writing binary output to {}", binary_path.display());
        BinarySink::new(&binary_path).write(&series)?;
    }
    Ok(series)
}

fn binary_sibling(output: &Path) -> PathBuf {
    let mut path = output.as_os_str().to_owned();
    path.push(".bin");
    PathBuf::from(path)
}

fn run_process(
    config_path: &Path,
    input_override: Option<&Path>,
    output_override: Option<&Path>,
    binary: bool,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let mut config = match build_pipeline_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(input) = input_override {
        config.input = input.to_path_buf();
    }
    if let Some(output) = output_override {
        config.output = output.to_path_buf();
    }
    if binary {
        config.binary_output = true;
    }

    if let Err(e) = validate_pipeline_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    match run_pipeline(&config) {
        Ok(series) => {
            eprintln!("Processed {} records", series.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let result = build_pipeline_config(&adapter).and_then(|config| {
        validate_pipeline_config(&config)?;
        Ok(config)
    });
    match result {
        Ok(config) => {
            println!("Config OK: {}", config_path.display());
            println!("  input:  {}", config.input.display());
            println!("  output: {}", config.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(input: &Path) -> ExitCode {
    let source = if input.extension().is_some_and(|ext| ext == "bin") {
        load_series(&BinarySource::new(input))
    } else {
        load_series(&CsvSource::new(input).keep_na())
    };
    let series = match source {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("File:    {}", input.display());
    println!("Records: {}", series.len());
    if let (Ok(first), Ok(last)) = (series.get(0), series.get(series.len().saturating_sub(1))) {
        if !first.timestamp.is_empty() {
            println!("Range:   {} .. {}", first.timestamp, last.timestamp);
        }
    }
    for col in Column::ALL {
        let values = series.column_values(col);
        let finite: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            println!("  {:<9} (no finite values)", col.name());
            continue;
        }
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!("  {:<9} min {min:.4}  max {max:.4}", col.name());
    }
    ExitCode::SUCCESS
}

fn load_series(source: &dyn SeriesSource) -> Result<TimeSeries, Error> {
    source.load()
}

fn run_convert(input: &Path, output: &Path, to: &str) -> ExitCode {
    let loaded = if input.extension().is_some_and(|ext| ext == "bin") {
        load_series(&BinarySource::new(input))
    } else {
        load_series(&CsvSource::new(input).keep_na())
    };
    let series = match loaded {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let written = match to {
        "csv" => CsvSink::new(output).write(&series),
        "binary" => BinarySink::new(output).write(&series),
        other => {
            eprintln!("error: --to must be 'csv' or 'binary', got '{other}'");
            return ExitCode::from(2);
        }
    };
    match written {
        Ok(()) => {
            eprintln!("Wrote {} records to {}", series.len(), output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_INI: &str = r#"
[data]
input = prices.csv
output = out.csv
drop_na = true

[indicators]
column = close
sma_windows = 10, 50
ema_windows = 12
roll_window = 20
roll_sum_windows = 5
volatility_window = 20
periods_per_year = 252.0

[signals]
sma_crossover = true
fast_window = 10
slow_window = 50
zscore = true
zscore_window = 20
entry_z = 2.0
exit_z = 0.5
"#;

    #[test]
    fn build_full_config() {
        let adapter = IniConfig::from_string(VALID_INI).unwrap();
        let config = build_pipeline_config(&adapter).unwrap();

        assert_eq!(config.input, PathBuf::from("prices.csv"));
        assert_eq!(config.sma_windows, vec![10, 50]);
        assert_eq!(config.ema_windows, vec![12]);
        assert_eq!(config.roll_window, Some(20));
        assert_eq!(config.roll_sum_windows, vec![5]);
        assert_eq!(config.roll_sum_column, "volume");
        assert_eq!(config.volatility_window, Some(20));
        assert!(config.drop_na);
        assert!(!config.binary_output);

        let sma = config.sma_signal.as_ref().unwrap();
        assert_eq!(sma.fast_window, 10);
        assert_eq!(sma.slow_window, 50);
        let z = config.zscore_signal.as_ref().unwrap();
        assert_eq!(z.window, 20);
        assert!((z.entry_z - 2.0).abs() < f64::EPSILON);
        assert!((z.exit_z - 0.5).abs() < f64::EPSILON);
        assert!(config.momentum_signal.is_none());
        assert!(config.bollinger_signal.is_none());

        assert!(validate_pipeline_config(&config).is_ok());
    }

    #[test]
    fn build_config_missing_input() {
        let adapter = IniConfig::from_string("[data]\noutput = out.csv\n").unwrap();
        let err = build_pipeline_config(&adapter).unwrap_err();
        assert!(matches!(err, Error::ConfigMissing { key, .. } if key == "input"));
    }

    #[test]
    fn build_config_defaults() {
        let adapter =
            IniConfig::from_string("[data]\ninput = a.csv\noutput = b.csv\n").unwrap();
        let config = build_pipeline_config(&adapter).unwrap();

        assert!(config.drop_na);
        assert_eq!(config.column, "close");
        assert!(config.sma_windows.is_empty());
        assert_eq!(config.roll_window, None);
        assert!((config.periods_per_year - 252.0).abs() < f64::EPSILON);
        assert!(config.sma_signal.is_none());
    }

    #[test]
    fn build_config_bad_window_list() {
        let ini = "[data]\ninput = a.csv\noutput = b.csv\n\n[indicators]\nsma_windows = 10,abc\n";
        let adapter = IniConfig::from_string(ini).unwrap();
        let err = build_pipeline_config(&adapter).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { key, .. } if key == "sma_windows"));
    }

    #[test]
    fn build_config_bad_date() {
        let ini = "[data]\ninput = a.csv\noutput = b.csv\nstart_date = 15-01-2024\n";
        let adapter = IniConfig::from_string(ini).unwrap();
        let err = build_pipeline_config(&adapter).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn build_config_signal_missing_window() {
        let ini = "[data]\ninput = a.csv\noutput = b.csv\n\n[signals]\nzscore = true\n";
        let adapter = IniConfig::from_string(ini).unwrap();
        let err = build_pipeline_config(&adapter).unwrap_err();
        assert!(matches!(err, Error::ConfigMissing { key, .. } if key == "zscore_window"));
    }

    #[test]
    fn binary_sibling_appends_extension() {
        assert_eq!(
            binary_sibling(Path::new("out/data.csv")),
            PathBuf::from("out/data.csv.bin")
        );
    }
}
