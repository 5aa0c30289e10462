//! Generation provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `ledgerpilot-core`, and the factory
//! ([`create_provider`]) that builds it from configuration and injected
//! credentials.
//!
//! [`LlmProvider`]: ledgerpilot_core::llm::provider::LlmProvider

pub mod openai_compat;

use ledgerpilot_core::llm::box_provider::BoxLlmProvider;
use ledgerpilot_types::config::GenerationConfig;
use ledgerpilot_types::error::ConfigError;

use crate::secret::Credentials;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{OPENAI_DEFAULT_BASE_URL, compatible_endpoint, openai_defaults};

/// Create a [`BoxLlmProvider`] for the configured chat model.
///
/// The base URL comes from `generation.base_url`, else from the shared
/// credentials. There is no silent default endpoint.
///
/// # Errors
///
/// [`ConfigError::MissingCredentials`] without an API key,
/// [`ConfigError::MissingEndpoint`] without a base URL.
pub fn create_provider(
    config: &GenerationConfig,
    credentials: &Credentials,
) -> Result<BoxLlmProvider, ConfigError> {
    let api_key = credentials.require_api_key()?.clone();
    let base_url = config
        .base_url
        .as_deref()
        .or(credentials.base_url.as_deref())
        .ok_or_else(|| {
            ConfigError::MissingEndpoint(
                "set OPENAI_BASE_URL (or OPENAI_API_BASE) or generation.base_url".to_string(),
            )
        })?;

    let provider_config = if base_url.trim_end_matches('/') == OPENAI_DEFAULT_BASE_URL {
        openai_defaults(api_key, &config.model)
    } else {
        compatible_endpoint(api_key, base_url, &config.model)
    };

    tracing::debug!(
        provider = %provider_config.provider_name,
        model = %config.model,
        "generation provider ready"
    );
    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(provider_config)))
}
