//! Transient failure classification.

use std::error::Error;
use std::io::ErrorKind;

/// Substrings (lowercase) that mark an error message or name as transient.
///
/// Driver-specific timeouts (`PgTimeout`, `PrismaTimeoutError`, ...) are
/// covered by `timeout`.
const TRANSIENT_MARKERS: [&str; 8] = [
    "timeout",
    "connection",
    "econnrefused",
    "enotfound",
    "econnreset",
    "network",
    "socket",
    "eai_again",
];

/// Short type name of an error, without module path or generic arguments.
///
/// # Examples
///
/// ```
/// use jblog_retry::error_name;
///
/// assert_eq!(error_name::<std::io::Error>(), "Error");
/// assert_eq!(error_name::<std::num::ParseIntError>(), "ParseIntError");
/// ```
pub fn error_name<E: ?Sized>() -> &'static str {
    let full = std::any::type_name::<E>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

/// Check whether an error is likely to go away on retry.
///
/// An error is transient when, case-insensitively, its type name or the
/// message of any error in its [`source`](Error::source) chain contains one of
/// `timeout`, `connection`, `econnrefused`, `enotfound`, `econnreset`,
/// `network`, `socket` or `eai_again`. A [`std::io::Error`] anywhere in the
/// chain with a timeout or connectivity kind is transient as well.
///
/// Everything else (validation errors, not found, bad credentials) is
/// terminal.
pub fn is_transient_error<E: Error + 'static>(err: &E) -> bool {
    if has_transient_marker(error_name::<E>()) {
        return true;
    }

    let mut current: Option<&(dyn Error + 'static)> = Some(err);
    while let Some(e) = current {
        if has_transient_marker(&e.to_string()) || is_transient_io(e) {
            return true;
        }
        current = e.source();
    }

    false
}

fn has_transient_marker(text: &str) -> bool {
    let text = text.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|marker| text.contains(marker))
}

fn is_transient_io(err: &(dyn Error + 'static)) -> bool {
    err.downcast_ref::<std::io::Error>().is_some_and(|io| {
        matches!(
            io.kind(),
            ErrorKind::TimedOut
                | ErrorKind::ConnectionRefused
                | ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::NotConnected
                | ErrorKind::BrokenPipe
                | ErrorKind::HostUnreachable
                | ErrorKind::NetworkUnreachable
                | ErrorKind::NetworkDown
        )
    })
}
