//! Application error type.

use thiserror::Error;

/// Errors that end the program.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("could not determine a cache directory for logs")]
    NoCacheDir,
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("failed to load brands: {0}")]
    Load(String),
}
