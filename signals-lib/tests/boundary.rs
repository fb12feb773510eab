//! Tests for error boundary recovery.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use signals_lib::boundary::{
    BoundaryConfig, BoundaryView, ErrorBoundary, Fault, FaultContext, FaultKind,
};
use signals_lib::error::{ErrorHandler, ErrorHandlerConfig};

fn faulted_boundary() -> ErrorBoundary {
    let boundary = ErrorBoundary::new(BoundaryConfig::named("brands"));
    boundary.render(|| Err::<(), _>(Fault::error("bad row")));
    boundary
}

#[tokio::test(start_paused = true)]
async fn test_retry_resets_after_backoff() {
    let boundary = faulted_boundary();

    assert_eq!(boundary.retry(), Some(Duration::from_secs(1)));
    assert!(boundary.is_faulted());

    tokio::time::sleep(Duration::from_millis(999)).await;
    assert!(boundary.is_faulted());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!boundary.is_faulted());
    assert_eq!(boundary.retry_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pending_retry_throttles_further_clicks() {
    let boundary = faulted_boundary();
    assert!(boundary.retry().is_some());
    assert_eq!(boundary.retry(), None);

    match boundary.render(|| Ok::<_, Fault>(())) {
        BoundaryView::Fallback(fallback) => {
            assert!(fallback.retry_pending);
            assert_eq!(fallback.retry_label(), "Retry attempt 2");
        }
        BoundaryView::Content(_) => panic!("still faulted"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_repeated_faults_back_off_exponentially() {
    let boundary = faulted_boundary();

    let mut delays = Vec::new();
    for _ in 0..3 {
        let delay = boundary.retry().expect("retry scheduled");
        delays.push(delay);
        tokio::time::sleep(delay + Duration::from_millis(1)).await;
        boundary.render(|| Err::<(), _>(Fault::error("still bad")));
    }
    assert_eq!(
        delays,
        vec![
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(4),
        ]
    );

    boundary.retry().expect("retry scheduled");
    tokio::time::sleep(Duration::from_secs(9)).await;
    assert_eq!(boundary.render(|| Ok::<_, Fault>(7)), BoundaryView::Content(7));
    assert_eq!(boundary.retry_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_reset() {
    let resets = Arc::new(AtomicU32::new(0));
    let counter = resets.clone();
    let boundary = ErrorBoundary::new(BoundaryConfig::default()).on_reset(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    boundary.render(|| Err::<(), _>(Fault::error("boom")));
    boundary.retry().expect("retry scheduled");
    drop(boundary);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(resets.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_props_reset_cancels_pending_retry() {
    let resets = Arc::new(AtomicU32::new(0));
    let counter = resets.clone();
    let boundary = ErrorBoundary::new(BoundaryConfig::default().reset_on_props_change(true))
        .on_reset(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    boundary.update_props(&("industry", 1));
    boundary.render(|| Err::<(), _>(Fault::error("boom")));
    boundary.retry().expect("retry scheduled");

    boundary.update_props(&("industry", 2));
    assert!(!boundary.is_faulted());
    assert_eq!(boundary.retry_count(), 0);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(resets.load(Ordering::SeqCst), 1);
}

#[test]
fn test_on_error_feeds_error_handler() {
    let surfaced = Arc::new(Mutex::new(Vec::new()));
    let sink = surfaced.clone();
    let handler = ErrorHandler::new(ErrorHandlerConfig::default().log_errors(false))
        .on_error(move |e| sink.lock().unwrap().push(e.to_string()));

    let contexts = Arc::new(Mutex::new(Vec::<FaultContext>::new()));
    let seen = contexts.clone();
    let boundary = ErrorBoundary::new(BoundaryConfig::named("dashboard")).on_error(
        move |fault, context| {
            assert_eq!(fault.kind, FaultKind::Panic);
            seen.lock().unwrap().push(context.clone());
            handler.handle_error(fault.message.as_str(), Some(context.boundary.as_str()));
        },
    );

    let label = boundary.render_or(
        || -> Result<String, Fault> { panic!("chart data missing") },
        |fallback| fallback.retry_label(),
    );
    assert_eq!(label, "Retry attempt 1");
    assert_eq!(
        *surfaced.lock().unwrap(),
        vec!["[dashboard] chart data missing".to_string()]
    );
    assert_eq!(contexts.lock().unwrap()[0].retry_count, 0);
}
