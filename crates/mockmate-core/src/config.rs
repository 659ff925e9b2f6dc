//! Shared configuration helpers for the collaborator crates.

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Unset variables resolve to the empty string, so factories can treat an
/// empty resolved secret as "not configured".
pub fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_MOCKMATE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_MOCKMATE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("proj-${_MOCKMATE_TEST_VAR}"),
            "proj-hello"
        );
        std::env::remove_var("_MOCKMATE_TEST_VAR");
    }

    #[test]
    fn unset_variable_resolves_empty() {
        assert_eq!(resolve_env_vars("${_MOCKMATE_UNSET_VAR}"), "");
    }

    #[test]
    fn plain_strings_pass_through() {
        assert_eq!(resolve_env_vars("no refs here"), "no refs here");
        assert_eq!(resolve_env_vars("${unclosed"), "${unclosed");
    }
}
