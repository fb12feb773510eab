//! Error reporting with duplicate suppression.

use std::fmt::{self, Display};
use std::future::Future;
use std::sync::{Arc, RwLock};

use log::{debug, error};

use super::Error;

/// Consecutive identical messages surfaced before the rest are suppressed.
pub const MAX_REPEATED_ERRORS: u32 = 3;

/// An error as seen by the [`ErrorHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledError {
    /// Human-readable message; also the identity used for suppression.
    pub message: String,
    /// Where the error happened, if the caller said.
    pub context: Option<String>,
}

impl HandledError {
    /// Creates an error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
        }
    }

    /// Creates an error from anything displayable.
    pub fn from_display(error: &impl Display) -> Self {
        Self::new(error.to_string())
    }

    /// Attaches a context string.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for HandledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "[{}] {}", context, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for HandledError {}

impl From<&str> for HandledError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for HandledError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&Error> for HandledError {
    fn from(error: &Error) -> Self {
        Self::from_display(error)
    }
}

impl From<Error> for HandledError {
    fn from(error: Error) -> Self {
        Self::from_display(&error)
    }
}

/// External destination for error reports.
pub trait ErrorSink: Send + Sync {
    /// Records one error.
    fn report(&self, error: &HandledError);
}

/// Sink that forwards reports to the `log` facade under the `signals::report` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&self, error: &HandledError) {
        error!(target: "signals::report", "{}", error);
    }
}

/// Which side effects the handler performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorHandlerConfig {
    /// Log surfaced errors through `log::error!`.
    pub log_errors: bool,
    /// Forward surfaced errors to the configured [`ErrorSink`].
    pub report_errors: bool,
}

impl Default for ErrorHandlerConfig {
    fn default() -> Self {
        Self {
            log_errors: true,
            report_errors: false,
        }
    }
}

impl ErrorHandlerConfig {
    /// Enables or disables logging.
    pub fn log_errors(mut self, enabled: bool) -> Self {
        self.log_errors = enabled;
        self
    }

    /// Enables or disables sink reporting.
    pub fn report_errors(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }
}

#[derive(Debug, Default)]
struct HandlerState {
    last_error: Option<HandledError>,
    repeat_count: u32,
}

type ErrorCallback = Arc<dyn Fn(&HandledError) + Send + Sync>;

/// Surfaces errors through logging, an external sink and a callback.
///
/// Identical consecutive messages are surfaced at most
/// [`MAX_REPEATED_ERRORS`] times; a different message resets the count.
/// The handler is cheap to clone; clones share suppression state.
///
/// # Example
///
/// ```
/// use signals_lib::error::{ErrorHandler, ErrorHandlerConfig};
///
/// let handler = ErrorHandler::new(ErrorHandlerConfig::default().log_errors(false));
/// for _ in 0..5 {
///     handler.handle_error("network down", None);
/// }
/// assert_eq!(handler.error_count(), 5);
/// assert!(!handler.handle_error("network down", None));
/// assert!(handler.handle_error("disk full", None));
/// ```
#[derive(Clone)]
pub struct ErrorHandler {
    config: ErrorHandlerConfig,
    sink: Option<Arc<dyn ErrorSink>>,
    on_error: Option<ErrorCallback>,
    state: Arc<RwLock<HandlerState>>,
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandler")
            .field("config", &self.config)
            .field("sink", &self.sink.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new(ErrorHandlerConfig::default())
    }
}

impl ErrorHandler {
    /// Creates a handler without sink or callback.
    pub fn new(config: ErrorHandlerConfig) -> Self {
        Self {
            config,
            sink: None,
            on_error: None,
            state: Arc::new(RwLock::new(HandlerState::default())),
        }
    }

    /// Sets the external sink.
    pub fn with_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Sets the callback invoked for every surfaced error.
    pub fn on_error(mut self, callback: impl Fn(&HandledError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Handles an error. Returns `true` if it was surfaced, `false` if suppressed.
    pub fn handle_error(&self, error: impl Into<HandledError>, context: Option<&str>) -> bool {
        let mut error = error.into();
        if let Some(context) = context {
            error.context = Some(context.to_string());
        }

        let surfaced = match self.state.write() {
            Ok(mut state) => {
                let repeated = state
                    .last_error
                    .as_ref()
                    .is_some_and(|last| last.message == error.message);
                state.repeat_count = if repeated {
                    state.repeat_count.saturating_add(1)
                } else {
                    1
                };
                state.last_error = Some(error.clone());
                state.repeat_count <= MAX_REPEATED_ERRORS
            }
            Err(_) => true,
        };

        if !surfaced {
            debug!("suppressed repeated error: {}", error.message);
            return false;
        }

        if self.config.log_errors {
            error!("{}", error);
        }
        if self.config.report_errors
            && let Some(sink) = &self.sink
        {
            sink.report(&error);
        }
        if let Some(on_error) = &self.on_error {
            on_error(&error);
        }
        true
    }

    /// Awaits `future`; on failure reports the error and returns `fallback`.
    pub async fn handle_async_error<T, E, Fut>(&self, future: Fut, fallback: T) -> T
    where
        E: Display,
        Fut: Future<Output = Result<T, E>>,
    {
        match future.await {
            Ok(value) => value,
            Err(e) => {
                self.handle_error(HandledError::from_display(&e), None);
                fallback
            }
        }
    }

    /// The most recently handled error, surfaced or not.
    pub fn last_error(&self) -> Option<HandledError> {
        self.state.read().ok().and_then(|s| s.last_error.clone())
    }

    /// How many times in a row the last message was handled.
    pub fn error_count(&self) -> u32 {
        self.state.read().map(|s| s.repeat_count).unwrap_or(0)
    }

    /// Forgets the last error.
    pub fn reset(&self) {
        if let Ok(mut state) = self.state.write() {
            *state = HandlerState::default();
        }
    }
}
