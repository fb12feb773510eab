//! Retry and error handling core for the Signals dashboard.
//!
//! Wraps asynchronous operations with bounded exponential-backoff retry,
//! classifies and reports failures through a duplicate-suppressing error
//! handler, and contains render faults in an [`boundary::ErrorBoundary`]
//! that offers throttled manual recovery.

pub mod boundary;
pub mod error;
pub mod retry;

pub use error::{Error, ErrorClass};
pub use retry::{Retry, RetryCall, RetryConfig, RetryError, RetryState, retry};
