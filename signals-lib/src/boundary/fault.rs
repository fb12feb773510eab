//! Render fault types.

use std::any::Any;

/// What produced a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The child returned an error.
    Error,
    /// The child panicked.
    Panic,
}

/// A failure while rendering a boundary's children.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Fault {
    /// Human-readable message.
    pub message: String,
    /// Error or panic.
    pub kind: FaultKind,
}

impl Fault {
    /// A fault from a returned error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FaultKind::Error,
        }
    }

    /// A fault from a caught panic.
    pub fn panic(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FaultKind::Panic,
        }
    }
}

/// Information passed to a boundary's `on_error` hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultContext {
    /// Name of the boundary that caught the fault.
    pub boundary: String,
    /// Retries already attempted for this boundary.
    pub retry_count: u32,
}

/// Extract a human-readable message from a panic payload.
///
/// Panics can contain either `&str` or `String` payloads. This function
/// attempts to extract either, falling back to a generic message.
pub fn extract_panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
