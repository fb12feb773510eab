//! Tests for retry sequences.
//!
//! Time is paused, so backoff delays elapse instantly and can be measured
//! exactly.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use signals_lib::error::Error;
use signals_lib::retry::{Retry, RetryConfig, RetryControl, RetryError, RetryState, retry};
use tokio::time::Instant;

fn config(max_retries: u32) -> RetryConfig {
    RetryConfig::default()
        .max_retries(max_retries)
        .initial_delay(Duration::from_millis(1000))
        .max_delay(Duration::from_millis(10000))
        .backoff_multiplier(2.0)
}

/// Operation failing `failures` times before returning the attempt number.
fn flaky(
    failures: u32,
    calls: Arc<AtomicU32>,
) -> impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = Result<u32, String>> + Send>> + Send + 'static
{
    move || {
        let calls = calls.clone();
        Box::pin(async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= failures {
                Err(format!("failure {}", n))
            } else {
                Ok(n)
            }
        })
    }
}

#[tokio::test(start_paused = true)]
async fn test_backoff_sequence_for_permanent_failure() {
    let start = Instant::now();
    let times = Arc::new(Mutex::new(Vec::new()));
    let recorder = times.clone();

    let result = retry(config(4), move || {
        recorder.lock().unwrap().push(start.elapsed());
        async { Err::<(), _>("service unavailable") }
    })
    .await;

    match result {
        Err(RetryError::Exhausted { attempts, error }) => {
            assert_eq!(attempts, 4);
            assert_eq!(error, "service unavailable");
        }
        other => panic!("expected exhaustion, got {:?}", other),
    }

    let times = times.lock().unwrap();
    let gaps: Vec<Duration> = times.windows(2).map(|w| w[1] - w[0]).collect();
    assert_eq!(
        gaps,
        vec![
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            Duration::from_millis(4000),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_success_on_third_attempt_resets_state() {
    let calls = Arc::new(AtomicU32::new(0));
    let retried = Arc::new(Mutex::new(Vec::new()));
    let sink = retried.clone();

    let retry = Retry::new(config(3)).on_retry(move |attempt, error: &String| {
        sink.lock().unwrap().push((attempt, error.clone()));
    });
    let control = RetryControl::new();
    let result = retry.execute(flaky(2, calls.clone()), &control).await;

    assert_eq!(result.ok(), Some(3));
    assert_eq!(control.state(), RetryState::default());
    assert_eq!(control.state().retry_count, 0);
    assert!(control.state().can_retry);
    assert_eq!(
        *retried.lock().unwrap(),
        vec![(1, "failure 1".to_string()), (2, "failure 2".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_marks_state_and_calls_hook() {
    let calls = Arc::new(AtomicU32::new(0));
    let exhausted = Arc::new(Mutex::new(None));
    let sink = exhausted.clone();

    let retry = Retry::new(config(2))
        .on_max_retries_reached(move |error: &String| *sink.lock().unwrap() = Some(error.clone()));
    let control = RetryControl::new();
    let result = retry.execute(flaky(10, calls.clone()), &control).await;

    assert!(matches!(result, Err(RetryError::Exhausted { attempts: 2, .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(exhausted.lock().unwrap().as_deref(), Some("failure 2"));

    let state = control.state();
    assert!(!state.can_retry);
    assert!(!state.is_retrying);
    assert_eq!(state.retry_count, 2);
    assert_eq!(state.last_error.as_deref(), Some("failure 2"));
}

#[tokio::test(start_paused = true)]
async fn test_non_retryable_errors_are_rejected() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let retry = Retry::new(config(5)).retry_if(Error::is_retryable);

    let result: Result<(), _> = retry
        .execute(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(Error::from(
                        signals_lib::error::ValidationError::field("name", "is required"),
                    ))
                }
            },
            &RetryControl::new(),
        )
        .await;

    assert!(matches!(result, Err(RetryError::Rejected(Error::Validation(_)))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_spawned_call_reports_result() {
    let calls = Arc::new(AtomicU32::new(0));
    let call = Retry::new(config(3)).run(flaky(1, calls.clone()));
    assert_eq!(call.await.ok(), Some(2));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_backoff_settles_call() {
    let calls = Arc::new(AtomicU32::new(0));
    let call = Retry::new(config(5)).run(flaky(10, calls.clone()));

    let mut state = call.subscribe();
    state
        .wait_for(|s| s.retry_count == 1 && s.is_retrying)
        .await
        .expect("state channel open");
    call.cancel();

    let result = call.await;
    assert!(result.as_ref().is_err_and(RetryError::is_cancelled));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_calls_have_independent_state() {
    let slow_calls = Arc::new(AtomicU32::new(0));
    let fast_calls = Arc::new(AtomicU32::new(0));
    let retry = Retry::new(config(4));

    let slow = retry.run(flaky(3, slow_calls.clone()));
    let fast = retry.run(flaky(0, fast_calls.clone()));

    assert_eq!(fast.await.ok(), Some(1));

    let mut state = slow.subscribe();
    state
        .wait_for(|s| s.retry_count >= 1)
        .await
        .expect("state channel open");
    assert!(slow.state().retry_count >= 1);
    assert_eq!(slow.await.ok(), Some(4));
}
