//! Credentials for remote model services.
//!
//! Credentials are resolved once at startup and handed to each client at
//! construction; nothing reads them from a global afterwards.

pub mod env;

use secrecy::SecretString;

use ledgerpilot_types::error::ConfigError;

use self::env::{API_KEY_VAR, BASE_URL_VARS, first_of, process_env};

/// API key and endpoint for OpenAI-compatible services.
///
/// Does NOT derive Debug so the key cannot end up in logs.
#[derive(Clone, Default)]
pub struct Credentials {
    pub api_key: Option<SecretString>,
    /// Base URL shared by embedding and generation unless overridden.
    pub base_url: Option<String>,
}

impl Credentials {
    /// Resolve from `OPENAI_API_KEY` and `OPENAI_BASE_URL` / `OPENAI_API_BASE`.
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup(API_KEY_VAR).map(SecretString::from),
            base_url: first_of(&lookup, BASE_URL_VARS),
        }
    }

    pub fn require_api_key(&self) -> Result<&SecretString, ConfigError> {
        self.api_key.as_ref().ok_or_else(|| {
            ConfigError::MissingCredentials(format!("set {API_KEY_VAR} to use a remote model"))
        })
    }
}
