//! Retry with exponential backoff.

mod config;
mod runner;
mod state;

pub use config::RetryConfig;
pub use runner::{Retry, RetryCall, RetryControl, RetryError, retry};
pub use state::RetryState;
