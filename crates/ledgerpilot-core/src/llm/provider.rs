//! LlmProvider trait definition.
//!
//! This is the generation service boundary. Uses RPITIT for `complete`;
//! `BoxLlmProvider` provides the object-safe wrapper the orchestrator holds.

use ledgerpilot_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends (OpenAI-compatible endpoints, test doubles).
///
/// Implementations must be reentrant: the orchestrator may issue several
/// `complete` calls concurrently for independent queries.
///
/// Implementations live in ledgerpilot-infra.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Model used when a request leaves `model` empty.
    fn default_model(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
