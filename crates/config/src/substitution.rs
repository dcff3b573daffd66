use anyhow::Result;
use regex::{Captures, Regex};
use std::env;
use std::sync::LazyLock;
use tracing::{debug, warn};

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+)\}|\$(\w+)").expect("env var pattern is valid"));

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME.
///
/// Unset variables are left in place so validation can report them.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let mut missing_vars = Vec::new();

    let result = ENV_VAR_PATTERN.replace_all(content, |caps: &Captures| {
        let placeholder = &caps[0];
        let var_name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {} = \"{}\"", var_name, value);
                value
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
                missing_vars.push(var_name.to_string());
                placeholder.to_string()
            }
        }
    });

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (may fail validation): {:?}",
            missing_vars
        );
    }

    Ok(result.into_owned())
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    ENV_VAR_PATTERN.is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_both_forms() {
        env::set_var("NCIF_TEST_DB_DIR", "/var/lib/ncif");
        let out = substitute_env_vars("path: ${NCIF_TEST_DB_DIR}/a.db\nother: $NCIF_TEST_DB_DIR").unwrap();
        assert_eq!(out, "path: /var/lib/ncif/a.db\nother: /var/lib/ncif");
    }

    #[test]
    fn test_unset_variable_is_kept() {
        env::remove_var("NCIF_TEST_UNSET_VAR");
        let out = substitute_env_vars("host: ${NCIF_TEST_UNSET_VAR}").unwrap();
        assert_eq!(out, "host: ${NCIF_TEST_UNSET_VAR}");
        assert!(has_unresolved_env_vars(&out));
        assert!(!has_unresolved_env_vars("host: 127.0.0.1"));
    }
}
