//! Multiplicathlon — application error types.

use multiplicathlon_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the application shell.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A core operation failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// File system error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
