//! Error boundary - fault containment for render steps.
//!
//! A boundary renders its children through a closure returning
//! `Result<V, Fault>`. Errors and panics switch it to the faulted state, in
//! which it renders a fallback with a retry affordance instead of the
//! children.
//!
//! ```text
//! Healthy --(child error or panic)--> Faulted
//! Faulted --(retry, after backoff)--> Healthy
//! Faulted --(props change, if enabled)--> Healthy
//! ```
//!
//! Manual retries are throttled with the same exponential backoff as
//! [`RetryConfig`]: the n-th retry resets the boundary after
//! `delay_for(n)`. Dropping the boundary cancels a pending reset.

mod fault;

pub use fault::{Fault, FaultContext, FaultKind, extract_panic_message};

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use log::{debug, error, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::retry::RetryConfig;

type FaultHook = Arc<dyn Fn(&Fault, &FaultContext) + Send + Sync>;
type ResetHook = Arc<dyn Fn() + Send + Sync>;

/// Boundary configuration.
#[derive(Debug, Clone)]
pub struct BoundaryConfig {
    /// Name reported in [`FaultContext`].
    pub name: String,
    /// Reset immediately when [`ErrorBoundary::update_props`] sees new props.
    pub reset_on_props_change: bool,
    /// Backoff schedule for manual retries.
    pub retry: RetryConfig,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            name: "boundary".to_string(),
            reset_on_props_change: false,
            retry: RetryConfig::default(),
        }
    }
}

impl BoundaryConfig {
    /// Creates a config with the given boundary name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Enables or disables reset on props change.
    pub fn reset_on_props_change(mut self, enabled: bool) -> Self {
        self.reset_on_props_change = enabled;
        self
    }

    /// Sets the retry backoff schedule.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Boundary state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryState {
    /// Children render normally.
    Healthy,
    /// Children failed; the fallback is shown.
    Faulted(Fault),
}

/// The fallback shown while faulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackView {
    /// Message of the fault.
    pub message: String,
    /// Retries already attempted.
    pub retry_count: u32,
    /// A reset is scheduled and further retries are ignored until it fires.
    pub retry_pending: bool,
}

impl FallbackView {
    /// Label for the retry affordance.
    pub fn retry_label(&self) -> String {
        format!("Retry attempt {}", self.retry_count + 1)
    }
}

/// What a boundary renders.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryView<V> {
    /// The children's view.
    Content(V),
    /// The fallback.
    Fallback(FallbackView),
}

#[derive(Debug)]
struct BoundaryInner {
    state: BoundaryState,
    retry_count: u32,
    reset_pending: bool,
    props_hash: Option<u64>,
}

impl BoundaryInner {
    fn fallback(&self) -> Option<FallbackView> {
        match &self.state {
            BoundaryState::Healthy => None,
            BoundaryState::Faulted(fault) => Some(FallbackView {
                message: fault.message.clone(),
                retry_count: self.retry_count,
                retry_pending: self.reset_pending,
            }),
        }
    }
}

/// Supervisor that contains faults from a render step.
///
/// # Example
///
/// ```
/// use signals_lib::boundary::{BoundaryConfig, BoundaryView, ErrorBoundary, Fault};
///
/// let boundary = ErrorBoundary::new(BoundaryConfig::named("brands"));
/// let view = boundary.render(|| Err::<String, _>(Fault::error("bad row")));
/// match view {
///     BoundaryView::Fallback(fallback) => assert_eq!(fallback.retry_label(), "Retry attempt 1"),
///     BoundaryView::Content(_) => unreachable!(),
/// }
/// assert!(boundary.is_faulted());
/// ```
pub struct ErrorBoundary {
    config: BoundaryConfig,
    inner: Arc<RwLock<BoundaryInner>>,
    pending: Mutex<Option<JoinHandle<()>>>,
    on_error: Option<FaultHook>,
    on_reset: Option<ResetHook>,
}

impl ErrorBoundary {
    /// Creates a healthy boundary.
    pub fn new(config: BoundaryConfig) -> Self {
        Self {
            config,
            inner: Arc::new(RwLock::new(BoundaryInner {
                state: BoundaryState::Healthy,
                retry_count: 0,
                reset_pending: false,
                props_hash: None,
            })),
            pending: Mutex::new(None),
            on_error: None,
            on_reset: None,
        }
    }

    /// Called whenever the boundary faults.
    pub fn on_error(mut self, hook: impl Fn(&Fault, &FaultContext) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Called whenever the boundary returns to healthy, so the host can re-render.
    pub fn on_reset(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_reset = Some(Arc::new(hook));
        self
    }

    /// Current state.
    pub fn state(&self) -> BoundaryState {
        self.inner
            .read()
            .map(|g| g.state.clone())
            .unwrap_or(BoundaryState::Healthy)
    }

    /// Returns `true` while the fallback is shown.
    pub fn is_faulted(&self) -> bool {
        matches!(self.state(), BoundaryState::Faulted(_))
    }

    /// Retries attempted since the last successful render.
    pub fn retry_count(&self) -> u32 {
        self.inner.read().map(|g| g.retry_count).unwrap_or(0)
    }

    /// Renders the children, or the fallback while faulted.
    ///
    /// A child error or panic faults the boundary and returns the fallback.
    /// A successful render clears the retry count.
    pub fn render<V>(&self, child: impl FnOnce() -> Result<V, Fault>) -> BoundaryView<V> {
        if let Some(fallback) = self.inner.read().ok().and_then(|g| g.fallback()) {
            return BoundaryView::Fallback(fallback);
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(child))
            .unwrap_or_else(|payload| Err(Fault::panic(extract_panic_message(&payload))));

        match outcome {
            Ok(view) => {
                if let Ok(mut guard) = self.inner.write() {
                    guard.retry_count = 0;
                }
                BoundaryView::Content(view)
            }
            Err(fault) => BoundaryView::Fallback(self.fault(fault)),
        }
    }

    /// Renders the children, mapping the fallback through `fallback`.
    pub fn render_or<V>(
        &self,
        child: impl FnOnce() -> Result<V, Fault>,
        fallback: impl FnOnce(&FallbackView) -> V,
    ) -> V {
        match self.render(child) {
            BoundaryView::Content(view) => view,
            BoundaryView::Fallback(view) => fallback(&view),
        }
    }

    fn fault(&self, fault: Fault) -> FallbackView {
        error!("boundary '{}' caught fault: {}", self.config.name, fault);
        let (view, retry_count) = match self.inner.write() {
            Ok(mut guard) => {
                guard.state = BoundaryState::Faulted(fault.clone());
                (guard.fallback(), guard.retry_count)
            }
            Err(_) => (None, 0),
        };

        if let Some(on_error) = &self.on_error {
            let context = FaultContext {
                boundary: self.config.name.clone(),
                retry_count,
            };
            on_error(&fault, &context);
        }

        view.unwrap_or(FallbackView {
            message: fault.message,
            retry_count,
            retry_pending: false,
        })
    }

    /// Requests a retry from the fallback.
    ///
    /// Schedules the reset after the backoff delay for this retry and returns
    /// that delay. Returns `None` when healthy, when a reset is already
    /// pending, or outside a tokio runtime.
    pub fn retry(&self) -> Option<Duration> {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("boundary '{}' retry requested outside a runtime", self.config.name);
                return None;
            }
        };

        let delay = {
            let mut guard = self.inner.write().ok()?;
            if guard.state == BoundaryState::Healthy || guard.reset_pending {
                return None;
            }
            guard.retry_count += 1;
            guard.reset_pending = true;
            self.config.retry.delay_for(guard.retry_count)
        };
        debug!("boundary '{}' resets in {:?}", self.config.name, delay);

        let inner = self.inner.clone();
        let on_reset = self.on_reset.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Ok(mut guard) = inner.write() {
                guard.state = BoundaryState::Healthy;
                guard.reset_pending = false;
            }
            if let Some(on_reset) = on_reset {
                on_reset();
            }
        });

        if let Ok(mut pending) = self.pending.lock()
            && let Some(previous) = pending.replace(task)
        {
            previous.abort();
        }
        Some(delay)
    }

    /// Records new props. Resets immediately if they changed and
    /// `reset_on_props_change` is enabled.
    pub fn update_props<P: Hash + ?Sized>(&self, props: &P) {
        let mut hasher = DefaultHasher::new();
        props.hash(&mut hasher);
        let hash = hasher.finish();

        let changed = match self.inner.write() {
            Ok(mut guard) => {
                let changed = guard.props_hash.is_some_and(|previous| previous != hash);
                guard.props_hash = Some(hash);
                changed
            }
            Err(_) => false,
        };

        if changed && self.config.reset_on_props_change && self.is_faulted() {
            debug!("boundary '{}' reset by props change", self.config.name);
            self.reset();
        }
    }

    /// Resets to healthy immediately, cancelling any pending reset.
    pub fn reset(&self) {
        self.cancel_pending();
        if let Ok(mut guard) = self.inner.write() {
            guard.state = BoundaryState::Healthy;
            guard.retry_count = 0;
            guard.reset_pending = false;
        }
        if let Some(on_reset) = &self.on_reset {
            on_reset();
        }
    }

    fn cancel_pending(&self) {
        if let Ok(mut pending) = self.pending.lock()
            && let Some(task) = pending.take()
        {
            task.abort();
        }
    }
}

impl Drop for ErrorBoundary {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl fmt::Debug for ErrorBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorBoundary")
            .field("config", &self.config)
            .field("inner", &self.inner)
            .finish()
    }
}
