//! Configuration for OpenAI-compatible generation endpoints.

use secrecy::SecretString;

/// Base URL used when neither config nor environment names one.
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible chat completions endpoint.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "vllm").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request leaves its model empty.
    pub model: String,
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: OPENAI_DEFAULT_BASE_URL.into(),
        api_key,
        model: model.into(),
    }
}

/// Any self-hosted or third-party server speaking the OpenAI protocol
/// (vLLM, Together, DeepInfra, a local gateway, ...).
pub fn compatible_endpoint(
    api_key: SecretString,
    base_url: &str,
    model: &str,
) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai-compatible".into(),
        base_url: base_url.trim_end_matches('/').into(),
        api_key,
        model: model.into(),
    }
}
