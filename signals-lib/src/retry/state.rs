//! Observable retry state.

/// Progress of one retry sequence, published for UI consumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    /// A failed attempt is waiting for (or running) its retry.
    pub is_retrying: bool,
    /// Number of failed attempts so far.
    pub retry_count: u32,
    /// Message of the most recent failure.
    pub last_error: Option<String>,
    /// False once the attempt budget is spent.
    pub can_retry: bool,
}

impl Default for RetryState {
    fn default() -> Self {
        Self {
            is_retrying: false,
            retry_count: 0,
            last_error: None,
            can_retry: true,
        }
    }
}
