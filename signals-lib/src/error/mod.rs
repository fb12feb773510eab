//! Error types and reporting.

mod handler;
mod validation;

pub use handler::{
    ErrorHandler, ErrorHandlerConfig, ErrorSink, HandledError, LogSink, MAX_REPEATED_ERRORS,
};
pub use validation::{FieldValidationError, ValidationError};

use crate::boundary::Fault;

/// How a failure should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Network or service failure; retried locally, escalated after exhaustion.
    Transient,
    /// Exception while rendering; contained by the nearest error boundary.
    Render,
    /// Contract violation; reported to the caller immediately, never retried.
    Validation,
}

/// Errors surfaced by dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transient operation failure.
    #[error("{0}")]
    Transient(String),

    /// Invalid input.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A render fault.
    #[error("Render failed: {0}")]
    Render(#[from] Fault),
}

impl Error {
    /// Creates a transient error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient(message.into())
    }

    /// Classifies this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Transient(_) => ErrorClass::Transient,
            Self::Validation(_) => ErrorClass::Validation,
            Self::Render(_) => ErrorClass::Render,
        }
    }

    /// Returns `true` if retrying may succeed.
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }
}
