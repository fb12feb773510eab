//! Retry configuration and backoff schedule.

use std::time::Duration;

/// Configuration for automatic retry behavior.
///
/// `max_retries` bounds the total number of attempts: an operation that keeps
/// failing is attempted `max_retries` times, with a backoff delay between
/// consecutive attempts.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use signals_lib::retry::RetryConfig;
///
/// // Default configuration
/// let config = RetryConfig::default();
/// assert_eq!(config.delay_for(1), Duration::from_secs(1));
///
/// // Custom configuration
/// let custom = RetryConfig::default()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(500))
///     .max_delay(Duration::from_secs(60))
///     .backoff_multiplier(3.0);
/// assert_eq!(custom.delay_for(3), Duration::from_millis(4500));
///
/// // A single attempt, no retries
/// let no_retry = RetryConfig::no_retry();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts.
    pub max_retries: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Factor applied to the delay after each failed attempt.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Creates a config that makes a single attempt.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 1,
            ..Default::default()
        }
    }

    /// Sets the maximum number of attempts.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Sets the initial delay between retries.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the backoff multiplier.
    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Delay to wait after failed attempt `attempt` (1-indexed).
    ///
    /// `min(initial_delay * backoff_multiplier^(attempt - 1), max_delay)`.
    /// Attempt 0 is treated as attempt 1.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.backoff_multiplier.max(0.0).powi(exponent);
        let millis = self.initial_delay.as_secs_f64() * 1000.0 * factor;
        let max_millis = self.max_delay.as_secs_f64() * 1000.0;
        if !millis.is_finite() || millis >= max_millis {
            return self.max_delay;
        }
        Duration::from_millis(millis.round() as u64)
    }

    /// Delays between attempts for an operation that never succeeds.
    pub fn schedule(&self) -> Vec<Duration> {
        (1..self.max_retries).map(|attempt| self.delay_for(attempt)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delays_double_and_cap() {
        let config = RetryConfig::default();
        let delays: Vec<u64> = (1..=6).map(|n| config.delay_for(n).as_millis() as u64).collect();
        assert_eq!(delays, vec![1000, 2000, 4000, 8000, 10000, 10000]);
    }

    #[test]
    fn test_attempt_zero_uses_initial_delay() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for(0), Duration::from_secs(1));
    }

    #[test]
    fn test_schedule_has_one_delay_between_each_attempt() {
        let config = RetryConfig::default().max_retries(4);
        assert_eq!(
            config.schedule(),
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(4000),
            ]
        );
        assert!(RetryConfig::no_retry().schedule().is_empty());
    }

    #[test]
    fn test_huge_attempt_saturates_at_max() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for(u32::MAX), config.max_delay);
    }
}
