//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The game options cannot produce a quiz (no operation enabled,
    /// empty tables, zero questions, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A command was issued that the current state does not allow.
    #[error("validation error: {0}")]
    Validation(String),

    /// No learner profile carries the given name.
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    /// The exam catalog has no entry with the given id.
    #[error("exam not found: {0}")]
    ExamNotFound(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
