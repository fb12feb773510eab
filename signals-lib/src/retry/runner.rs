//! Retry execution.

use std::fmt::{self, Display};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use log::{debug, error, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::config::RetryConfig;
use super::state::RetryState;

type RetryHook<E> = Arc<dyn Fn(u32, &E) + Send + Sync>;
type ExhaustedHook<E> = Arc<dyn Fn(&E) + Send + Sync>;
type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Errors returned by a retry sequence.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// Every attempt failed; carries the last failure.
    #[error("failed after {attempts} attempts: {error}")]
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The final error.
        error: E,
    },

    /// The failure was not retryable.
    #[error("{0}")]
    Rejected(E),

    /// Cancelled while waiting to retry.
    #[error("retry cancelled")]
    Cancelled,

    /// The task running the sequence panicked or was aborted.
    #[error("retry task aborted: {0}")]
    Aborted(String),
}

impl<E> RetryError<E> {
    /// Returns `true` if the sequence was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// State channel and cancellation for one retry sequence.
///
/// Every sequence gets its own control, so concurrent sequences never share
/// counters.
#[derive(Debug)]
pub struct RetryControl {
    state: watch::Sender<RetryState>,
    cancel: CancellationToken,
}

impl Default for RetryControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryControl {
    /// Creates a fresh control with default state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(RetryState::default());
        Self {
            state,
            cancel: CancellationToken::new(),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RetryState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<RetryState> {
        self.state.subscribe()
    }

    /// Cancels a pending retry.
    ///
    /// An attempt that is already running is allowed to finish; the sequence
    /// settles with [`RetryError::Cancelled`] instead of scheduling another.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` if [`cancel`](Self::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn update(&self, f: impl FnOnce(&mut RetryState)) {
        self.state.send_modify(f);
    }
}

/// Retry policy: configuration plus hooks.
///
/// # Example
///
/// ```
/// use signals_lib::retry::{Retry, RetryConfig, RetryControl};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let retry = Retry::new(RetryConfig::default())
///     .on_retry(|attempt, error: &String| eprintln!("attempt {} failed: {}", attempt, error));
///
/// let control = RetryControl::new();
/// let value = retry.execute(|| async { Ok::<_, String>(42) }, &control).await;
/// assert_eq!(value.ok(), Some(42));
/// # }
/// ```
pub struct Retry<E> {
    config: RetryConfig,
    on_retry: Option<RetryHook<E>>,
    on_max_retries_reached: Option<ExhaustedHook<E>>,
    retry_if: Option<RetryPredicate<E>>,
}

impl<E> Clone for Retry<E> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            on_retry: self.on_retry.clone(),
            on_max_retries_reached: self.on_max_retries_reached.clone(),
            retry_if: self.retry_if.clone(),
        }
    }
}

impl<E> fmt::Debug for Retry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("config", &self.config)
            .field("on_retry", &self.on_retry.is_some())
            .field("on_max_retries_reached", &self.on_max_retries_reached.is_some())
            .field("retry_if", &self.retry_if.is_some())
            .finish()
    }
}

impl<E> Default for Retry<E> {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl<E> Retry<E> {
    /// Creates a retry policy with no hooks.
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            on_retry: None,
            on_max_retries_reached: None,
            retry_if: None,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Called after every failed attempt with its 1-based number.
    pub fn on_retry(mut self, hook: impl Fn(u32, &E) + Send + Sync + 'static) -> Self {
        self.on_retry = Some(Arc::new(hook));
        self
    }

    /// Called once when the last allowed attempt fails.
    pub fn on_max_retries_reached(mut self, hook: impl Fn(&E) + Send + Sync + 'static) -> Self {
        self.on_max_retries_reached = Some(Arc::new(hook));
        self
    }

    /// Only retry errors for which `predicate` returns true.
    ///
    /// Other errors end the sequence immediately with [`RetryError::Rejected`].
    pub fn retry_if(mut self, predicate: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        self.retry_if = Some(Arc::new(predicate));
        self
    }

    fn should_retry(&self, error: &E) -> bool {
        self.retry_if.as_ref().is_none_or(|predicate| predicate(error))
    }
}

impl<E: Display> Retry<E> {
    /// Runs `operation` until it succeeds, the attempt budget is spent, a
    /// non-retryable error occurs, or `control` is cancelled.
    ///
    /// Attempts are strictly sequential: the next attempt starts only after
    /// the previous failure was recorded and its backoff delay elapsed.
    pub async fn execute<T, F, Fut>(
        &self,
        mut operation: F,
        control: &RetryControl,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;

        loop {
            if control.is_cancelled() {
                control.update(|s| s.is_retrying = false);
                return Err(RetryError::Cancelled);
            }

            attempt += 1;
            let error = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("operation succeeded on attempt {}", attempt);
                    }
                    control.update(|s| *s = RetryState::default());
                    return Ok(value);
                }
                Err(error) => error,
            };

            let message = error.to_string();
            control.update(|s| {
                s.retry_count = attempt;
                s.last_error = Some(message.clone());
            });

            if !self.should_retry(&error) {
                debug!("attempt {} failed with non-retryable error: {}", attempt, message);
                control.update(|s| {
                    s.is_retrying = false;
                    s.can_retry = false;
                });
                return Err(RetryError::Rejected(error));
            }

            if let Some(on_retry) = &self.on_retry {
                on_retry(attempt, &error);
            }

            if attempt >= self.config.max_retries {
                error!("operation failed after {} attempts: {}", attempt, message);
                control.update(|s| {
                    s.is_retrying = false;
                    s.can_retry = false;
                });
                if let Some(on_max) = &self.on_max_retries_reached {
                    on_max(&error);
                }
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    error,
                });
            }

            let delay = self.config.delay_for(attempt);
            warn!("attempt {} failed: {}; retrying in {:?}", attempt, message, delay);
            control.update(|s| s.is_retrying = true);

            tokio::select! {
                _ = control.cancel.cancelled() => {
                    debug!("retry cancelled during backoff after attempt {}", attempt);
                    control.update(|s| s.is_retrying = false);
                    return Err(RetryError::Cancelled);
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

impl<E: Display + Send + 'static> Retry<E> {
    /// Spawns a retry sequence for `operation` on the current tokio runtime.
    ///
    /// The returned [`RetryCall`] is a future for the final result and a
    /// handle to the sequence's own state and cancellation. Dropping the call
    /// detaches the sequence; it keeps running to completion.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn run<T, F, Fut>(&self, operation: F) -> RetryCall<T, E>
    where
        T: Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let control = Arc::new(RetryControl::new());
        let retry = self.clone();
        let task_control = control.clone();
        let task = tokio::spawn(async move { retry.execute(operation, &task_control).await });
        RetryCall { control, task }
    }
}

/// Runs `operation` with the given configuration and no hooks.
pub async fn retry<T, E, F, Fut>(config: RetryConfig, operation: F) -> Result<T, RetryError<E>>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    Retry::new(config)
        .execute(operation, &RetryControl::new())
        .await
}

/// A spawned retry sequence.
///
/// Await it for the result; inspect or cancel it through the handle methods.
#[derive(Debug)]
pub struct RetryCall<T, E> {
    control: Arc<RetryControl>,
    task: JoinHandle<Result<T, RetryError<E>>>,
}

impl<T, E> RetryCall<T, E> {
    /// Snapshot of this sequence's state.
    pub fn state(&self) -> RetryState {
        self.control.state()
    }

    /// Subscribes to this sequence's state changes.
    pub fn subscribe(&self) -> watch::Receiver<RetryState> {
        self.control.subscribe()
    }

    /// Cancels the pending retry, settling the call with [`RetryError::Cancelled`].
    pub fn cancel(&self) {
        self.control.cancel();
    }
}

impl<T, E> Future for RetryCall<T, E> {
    type Output = Result<T, RetryError<E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.task).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) => Err(RetryError::Aborted(e.to_string())),
        })
    }
}
