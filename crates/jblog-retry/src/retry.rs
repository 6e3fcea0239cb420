//! Retry driver.

use std::error::Error;
use std::future::Future;

use crate::options::RetryOptions;

/// Run `operation`, retrying transient failures with exponential backoff.
///
/// Attempts are numbered from 0; at most `max_retries + 1` attempts are made.
/// After a failed attempt:
///
/// - if it was the last allowed attempt, its error is returned;
/// - if the error is not retryable, it is returned immediately;
/// - otherwise `on_retry(&err, attempt + 1)` runs (or a warning is logged),
///   the task sleeps for `delay * backoff^attempt`, and the next attempt
///   starts.
///
/// The returned error is always the exact value produced by the operation.
/// There is no per-attempt timeout and no cancellation beyond dropping the
/// returned future.
pub async fn retry<F, Fut, T, E>(mut operation: F, mut options: RetryOptions<E>) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error + 'static,
{
    let mut attempt: u32 = 0;

    loop {
        let err = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::debug!(attempt, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if attempt >= options.max_retries {
            tracing::debug!(attempts = attempt + 1, error = %err, "Retries exhausted");
            return Err(err);
        }

        if !options.is_retryable(&err) {
            tracing::debug!(attempt, error = %err, "Error is not retryable");
            return Err(err);
        }

        let wait = options.wait_time(attempt);
        let next = attempt + 1;
        match options.on_retry.as_mut() {
            Some(callback) => callback(&err, next),
            None => tracing::warn!(
                attempt = next,
                max_retries = options.max_retries,
                wait = ?wait,
                error = %err,
                "Operation failed, retrying"
            ),
        }
        drop(err);

        tokio::time::sleep(wait).await;
        attempt = next;
    }
}

/// Run `operation` with the [`RetryOptions::database`] preset.
pub async fn retry_database<F, Fut, T, E>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error + 'static,
{
    retry(operation, RetryOptions::database()).await
}
