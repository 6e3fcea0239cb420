//! Retry configuration.

use std::fmt;
use std::time::Duration;

use crate::classify::is_transient_error;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default wait before the first retry.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Default growth factor applied to the wait on every retry.
pub const DEFAULT_BACKOFF: f64 = 2.0;

/// Callback invoked with the failed attempt's error and the upcoming attempt
/// number (starting at 1) right before sleeping.
pub type RetryCallback<E> = Box<dyn FnMut(&E, u32) + Send>;

/// Options for [`retry`](crate::retry).
///
/// Built with chained setters starting from [`RetryOptions::new`] (defaults:
/// 3 retries, 1 s delay, backoff 2) or [`RetryOptions::database`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use jblog_retry::RetryOptions;
///
/// let options = RetryOptions::<std::io::Error>::new()
///     .max_retries(2)
///     .delay(Duration::from_millis(500))
///     .backoff(3.0);
///
/// assert_eq!(options.wait_time(0), Duration::from_millis(500));
/// assert_eq!(options.wait_time(1), Duration::from_millis(1500));
/// ```
pub struct RetryOptions<E> {
    pub(crate) max_retries: u32,
    pub(crate) delay: Duration,
    pub(crate) backoff: f64,
    pub(crate) on_retry: Option<RetryCallback<E>>,
    pub(crate) retry_if: Option<fn(&E) -> bool>,
}

impl<E> Default for RetryOptions<E> {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_DELAY,
            backoff: DEFAULT_BACKOFF,
            on_retry: None,
            retry_if: None,
        }
    }
}

impl<E> fmt::Debug for RetryOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOptions")
            .field("max_retries", &self.max_retries)
            .field("delay", &self.delay)
            .field("backoff", &self.backoff)
            .field("on_retry", &self.on_retry.is_some())
            .field("retry_if", &self.retry_if.is_some())
            .finish()
    }
}

impl<E> RetryOptions<E> {
    /// Create options with the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of retries after the first attempt.
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the wait before the first retry.
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the multiplicative growth of the wait per retry.
    #[must_use]
    pub fn backoff(mut self, backoff: f64) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replace the default warning log with a custom callback.
    #[must_use]
    pub fn on_retry(mut self, callback: impl FnMut(&E, u32) + Send + 'static) -> Self {
        self.on_retry = Some(Box::new(callback));
        self
    }

    /// Replace the transient-failure check.
    ///
    /// Defaults to [`is_transient_error`].
    #[must_use]
    pub fn retry_if(mut self, predicate: fn(&E) -> bool) -> Self {
        self.retry_if = Some(predicate);
        self
    }

    /// Wait before the retry that follows the 0-based `attempt`.
    ///
    /// Computed as `delay * backoff^attempt`. Negative results clamp to zero
    /// and overflow saturates at [`Duration::MAX`].
    pub fn wait_time(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.delay.as_secs_f64() * self.backoff.powi(exponent);
        Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// Check whether `err` should be retried.
    pub(crate) fn is_retryable(&self, err: &E) -> bool
    where
        E: std::error::Error + 'static,
    {
        match self.retry_if {
            Some(predicate) => predicate(err),
            None => is_transient_error(err),
        }
    }
}

impl<E: fmt::Display + 'static> RetryOptions<E> {
    /// Preset for database calls.
    ///
    /// 3 retries, 1 s delay, backoff 2, and a callback logging each retry with
    /// its attempt number. Every field can still be overridden.
    #[must_use]
    pub fn database() -> Self {
        Self::new()
            .max_retries(DEFAULT_MAX_RETRIES)
            .delay(DEFAULT_DELAY)
            .backoff(DEFAULT_BACKOFF)
            .on_retry(|err: &E, attempt| {
                tracing::warn!(attempt, error = %err, "Database operation failed, retrying");
            })
    }
}
