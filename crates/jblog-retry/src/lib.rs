//! Async retry with exponential backoff.
//!
//! This crate wraps a fallible async operation and re-runs it when the failure
//! looks transient (timeouts, refused or reset connections, DNS hiccups).
//!
//! # Architecture
//!
//! - [`RetryOptions`] holds the attempt budget, base delay, backoff factor and
//!   an optional per-retry callback.
//! - [`retry`] drives the attempts. The only suspension point besides the
//!   operation itself is [`tokio::time::sleep`] between attempts.
//! - [`is_transient_error`] decides whether a failure is worth another try.
//!
//! Errors are never wrapped: the caller always gets back the exact error value
//! produced by the last attempt.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use jblog_retry::{RetryOptions, retry};
//!
//! let body = retry(
//!     || fetch_post("hello-world"),
//!     RetryOptions::new().max_retries(5).delay(Duration::from_millis(200)),
//! )
//! .await?;
//! ```

mod classify;
mod options;
mod retry;

pub use classify::{error_name, is_transient_error};
pub use options::{
    DEFAULT_BACKOFF, DEFAULT_DELAY, DEFAULT_MAX_RETRIES, RetryCallback, RetryOptions,
};
pub use retry::{retry, retry_database};
