//! Environment variable lookup.
//!
//! Environment variables take precedence over `config.toml`. Values are
//! read through a lookup function so resolution can be tested without
//! mutating the process environment.

/// Environment variable carrying the API key for OpenAI-compatible services.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Base URL variables, in precedence order.
pub const BASE_URL_VARS: &[&str] = &["OPENAI_BASE_URL", "OPENAI_API_BASE"];
pub const EMBED_MODEL_VAR: &str = "EMBED_MODEL";
pub const CHAT_MODEL_VAR: &str = "CHAT_MODEL";

/// Read a variable from the process environment.
///
/// Unset, empty and non-Unicode values all count as absent.
pub fn process_env(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => Some(val),
        Ok(_) => None,
        Err(std::env::VarError::NotPresent) => None,
        Err(std::env::VarError::NotUnicode(_)) => {
            tracing::warn!(key, "environment variable is not valid Unicode; ignoring");
            None
        }
    }
}

/// First variable in `keys` that `lookup` resolves.
pub fn first_of(lookup: impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| lookup(*k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_of_respects_order() {
        let lookup = |k: &str| match k {
            "OPENAI_BASE_URL" => Some("https://a/v1".to_string()),
            "OPENAI_API_BASE" => Some("https://b/v1".to_string()),
            _ => None,
        };
        assert_eq!(first_of(lookup, BASE_URL_VARS).as_deref(), Some("https://a/v1"));

        let only_legacy = |k: &str| (k == "OPENAI_API_BASE").then(|| "https://b/v1".to_string());
        assert_eq!(first_of(only_legacy, BASE_URL_VARS).as_deref(), Some("https://b/v1"));
        assert!(first_of(|_| None, BASE_URL_VARS).is_none());
    }

    #[test]
    fn test_process_env_missing() {
        assert!(process_env("LEDGERPILOT_TEST_DEFINITELY_UNSET_VAR").is_none());
    }
}
