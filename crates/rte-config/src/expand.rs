//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use std::convert::Infallible;

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    if let Some(missing) = required_vars(value).find(|var| std::env::var(var).is_err()) {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{missing}}} not set"),
        });
    }

    shellexpand::env_with_context(value, |var| {
        Ok::<_, Infallible>(std::env::var(var).ok())
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| match e.cause {})
}

/// Variables referenced as `${VAR}` without a `:-default` fallback.
fn required_vars(value: &str) -> impl Iterator<Item = &str> {
    value.match_indices("${").filter_map(move |(start, _)| {
        let rest = &value[start + 2..];
        let inner = &rest[..rest.find('}')?];
        (!inner.contains(":-")).then_some(inner)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("RTE_TEST_VAR_SIMPLE", "https://cdn.example.com");
        }
        let result = expand_env("${RTE_TEST_VAR_SIMPLE}/assets", "assets.base_url").unwrap();
        assert_eq!(result, "https://cdn.example.com/assets");
        unsafe {
            std::env::remove_var("RTE_TEST_VAR_SIMPLE");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("RTE_UNSET_VAR_TEST");
        }
        let result = expand_env("${RTE_UNSET_VAR_TEST:-v1}", "assets.version").unwrap();
        assert_eq!(result, "v1");
    }

    #[test]
    fn test_expand_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("RTE_MISSING_VAR_TEST");
        }
        let err = expand_env("${RTE_MISSING_VAR_TEST}", "options.base_path").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("RTE_MISSING_VAR_TEST"));
        assert!(msg.contains("options.base_path"));
    }

    #[test]
    fn test_expand_literal_unchanged() {
        let result = expand_env("bundles/tuieditor/", "options.base_path").unwrap();
        assert_eq!(result, "bundles/tuieditor/");
    }

    #[test]
    fn test_required_vars_skips_defaults() {
        let vars: Vec<&str> = required_vars("${A}/${B:-x}/${C}").collect();
        assert_eq!(vars, vec!["A", "C"]);
    }
}
