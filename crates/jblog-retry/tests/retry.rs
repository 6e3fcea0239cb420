//! Retry behaviour against simulated flaky operations.
//!
//! Tests run on a paused tokio clock, so sleeps complete instantly while
//! `Instant::elapsed` still reports the virtual time spent waiting.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jblog_retry::{RetryOptions, is_transient_error, retry};
use pretty_assertions::assert_eq;
use tokio::time::Instant;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct TimeoutError(String);

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct ApiError(String);

const DELAY: Duration = Duration::from_millis(250);

#[tokio::test(start_paused = true)]
async fn test_success_on_first_call() {
    let calls = AtomicU32::new(0);

    let result = retry(
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ApiError>("post") }
        },
        RetryOptions::new(),
    )
    .await;

    assert_eq!(result.unwrap(), "post");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_two_timeouts_then_success() {
    let calls = AtomicU32::new(0);
    let attempt_times = Mutex::new(Vec::new());
    let start = Instant::now();

    let result = retry(
        || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            attempt_times.lock().unwrap().push(start.elapsed());
            async move {
                if n < 2 {
                    Err(TimeoutError("request timed out".to_owned()))
                } else {
                    Ok(42)
                }
            }
        },
        RetryOptions::new().max_retries(3).delay(DELAY).backoff(2.0),
    )
    .await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let times = attempt_times.into_inner().unwrap();
    assert_eq!(times.len(), 3);
    let gaps: Vec<_> = times.windows(2).map(|w| w[1] - w[0]).collect();
    let tolerance = Duration::from_millis(5);
    for (gap, expected) in gaps.iter().zip([DELAY, DELAY * 2]) {
        assert!(
            *gap >= expected && *gap <= expected + tolerance,
            "gap {gap:?}, expected {expected:?}"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_terminal_error_not_retried() {
    let calls = AtomicU32::new(0);
    let start = Instant::now();

    let result = retry(
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(ApiError("invalid input".to_owned())) }
        },
        RetryOptions::new().delay(DELAY),
    )
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "invalid input");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_return_last_error() {
    let calls = AtomicU32::new(0);

    let result = retry(
        || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Err::<(), _>(ApiError(format!("connection reset (attempt {n})"))) }
        },
        RetryOptions::new().max_retries(2).delay(DELAY),
    )
    .await;

    let err = result.unwrap_err();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(err.to_string(), "connection reset (attempt 2)");
}

#[tokio::test(start_paused = true)]
async fn test_on_retry_called_between_attempts() {
    let calls = AtomicU32::new(0);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);

    let result = retry(
        || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 3 {
                    Err(ApiError("socket hang up".to_owned()))
                } else {
                    Ok(n)
                }
            }
        },
        RetryOptions::new()
            .max_retries(5)
            .delay(DELAY)
            .on_retry(move |err: &ApiError, attempt| {
                recorder.lock().unwrap().push((attempt, err.to_string()));
            }),
    )
    .await;

    assert_eq!(result.unwrap(), 3);
    let actual_attempts = calls.load(Ordering::SeqCst);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), actual_attempts as usize - 1);
    assert_eq!(
        seen.iter().map(|(attempt, _)| *attempt).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert!(seen.iter().all(|(_, msg)| msg == "socket hang up"));
}

#[tokio::test(start_paused = true)]
async fn test_on_retry_not_called_for_terminal_error() {
    let seen = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&seen);

    let result = retry(
        || async { Err::<(), _>(ApiError("forbidden".to_owned())) },
        RetryOptions::new().on_retry(move |_: &ApiError, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(seen.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_total_wait_follows_backoff() {
    let start = Instant::now();

    let result = retry(
        || async { Err::<(), _>(TimeoutError("slow".to_owned())) },
        RetryOptions::new().max_retries(3).delay(DELAY).backoff(2.0),
    )
    .await;

    assert!(result.is_err());
    // 250 + 500 + 1000 ms
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1750), "{elapsed:?}");
    assert!(elapsed <= Duration::from_millis(1760), "{elapsed:?}");
}

#[test]
fn test_error_types_classified() {
    assert!(is_transient_error(&TimeoutError("anything".to_owned())));
    assert!(is_transient_error(&ApiError("ECONNREFUSED".to_owned())));
    assert!(!is_transient_error(&ApiError("invalid input".to_owned())));
}
