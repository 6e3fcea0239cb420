//! Shared helpers for attribute output.

use std::borrow::Cow;

/// URL prefixes accepted for inline images.
const ALLOWED_IMAGE_PREFIXES: [&str; 3] = ["http://", "https://", "/"];

/// Escape a value for use inside a quoted HTML attribute.
///
/// Only `'` and `"` are replaced. Other markup passes through untouched.
///
/// # Examples
///
/// ```
/// use jblog_markdown::escape_attr;
///
/// assert_eq!(escape_attr(r#"it's "quoted""#), "it&#39;s &quot;quoted&quot;");
/// assert_eq!(escape_attr("a < b"), "a < b");
/// ```
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['\'', '"']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '\'' => escaped.push_str("&#39;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Check whether an image URL uses an allowed scheme or is site-relative.
///
/// # Examples
///
/// ```
/// use jblog_markdown::is_allowed_image_url;
///
/// assert!(is_allowed_image_url("https://cdn.example.com/a.png"));
/// assert!(is_allowed_image_url("/uploads/a.png"));
/// assert!(!is_allowed_image_url("javascript:alert(1)"));
/// ```
pub fn is_allowed_image_url(url: &str) -> bool {
    ALLOWED_IMAGE_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}
