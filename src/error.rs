use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{function}() is not defined for negative input {value}")]
    NegativeInput { function: &'static str, value: i64 },

    #[error("zero cannot be raised to a negative power")]
    ZeroToNegativePower,

    #[error("chunk size must be at least 1")]
    InvalidChunkSize,

    #[error("cannot summarize an empty list")]
    EmptyInput,

    #[error("non-finite value {0} in input")]
    NonFinite(f64),

    #[error("argument {position} must be positive, got {value}")]
    NotPositive { position: usize, value: String },

    #[error("unknown module: {0}")]
    UnknownModule(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}

impl Error {
    /// Whether this error is a domain error (argument outside the function's
    /// defined input range) as opposed to a wrapper validation failure.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Error::NegativeInput { .. }
                | Error::ZeroToNegativePower
                | Error::InvalidChunkSize
                | Error::EmptyInput
                | Error::NonFinite(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
