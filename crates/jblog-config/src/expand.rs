//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// Values without `${` are returned unchanged, so a bare `$` in a URL path is
/// left alone.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Name of the variable that could not be resolved.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_api_host() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("JBLOG_TEST_API_HOST", "api.jblog.dev");
        }
        let result = expand_env("https://${JBLOG_TEST_API_HOST}/v1", "api.base_url").unwrap();
        assert_eq!(result, "https://api.jblog.dev/v1");
        unsafe {
            std::env::remove_var("JBLOG_TEST_API_HOST");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("JBLOG_TEST_UNSET_URL");
        }
        let result =
            expand_env("${JBLOG_TEST_UNSET_URL:-http://localhost:8080}", "api.base_url").unwrap();
        assert_eq!(result, "http://localhost:8080");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("JBLOG_TEST_MISSING");
        }
        let err = expand_env("${JBLOG_TEST_MISSING}", "api.base_url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("JBLOG_TEST_MISSING"));
        assert!(err.to_string().contains("api.base_url"));
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(
            expand_env("https://example.com/$path", "api.base_url").unwrap(),
            "https://example.com/$path"
        );
    }
}
