//! Domain error types.
//!
//! Only two error kinds originate in the computation engine itself:
//! [`Error::UnknownColumn`] and [`Error::IndexOutOfRange`], both programming
//! errors surfaced immediately. Data irregularities (warm-up gaps, zero
//! variance, near-zero denominators) never raise; they flow through the
//! NaN sentinel convention instead.

/// Top-level error type for quantsig.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown column: {name}")]
    UnknownColumn { name: String },

    #[error("row index {index} out of range (series has {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error in {path}: {reason}")]
    Data { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&Error> for std::process::ExitCode {
    fn from(err: &Error) -> Self {
        let code: u8 = match err {
            Error::Io(_) => 1,
            Error::ConfigParse { .. }
            | Error::ConfigMissing { .. }
            | Error::ConfigInvalid { .. } => 2,
            Error::Data { .. } => 3,
            Error::UnknownColumn { .. } | Error::IndexOutOfRange { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
