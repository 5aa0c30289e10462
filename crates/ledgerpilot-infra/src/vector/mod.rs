//! Embedding backends and index persistence.
//!
//! Provides the remote (OpenAI-compatible HTTP) and local (fastembed)
//! embedders, the factory that picks one from configuration, and the JSON
//! file store for built indexes.

pub mod embedder;
pub mod file;
pub mod openai_embedder;

use std::path::Path;
use std::time::Duration;

use ledgerpilot_core::embedding::{BoxEmbedder, EmbeddingClient};
use ledgerpilot_types::config::{EmbeddingConfig, EmbeddingProviderKind};
use ledgerpilot_types::error::{ConfigError, CopilotError};

use crate::secret::Credentials;

use self::embedder::FastEmbedEmbedder;
use self::openai_embedder::OpenAiEmbedder;

pub use file::FileIndexStore;

/// Build the batching embedding client described by `config`.
///
/// A remote provider without an API key or endpoint fails here, before any
/// text is embedded.
pub fn create_embedding_client(
    config: &EmbeddingConfig,
    credentials: &Credentials,
    data_dir: &Path,
) -> Result<EmbeddingClient, CopilotError> {
    let embedder = match config.provider {
        EmbeddingProviderKind::OpenAi => {
            let api_key = credentials.require_api_key()?;
            let base_url = config
                .base_url
                .as_deref()
                .or(credentials.base_url.as_deref())
                .ok_or_else(|| {
                    ConfigError::MissingEndpoint(
                        "set OPENAI_BASE_URL (or OPENAI_API_BASE) or embedding.base_url".to_string(),
                    )
                })?;
            BoxEmbedder::new(OpenAiEmbedder::new(
                api_key,
                base_url,
                &config.model,
                config.dimensions,
                Duration::from_secs(config.timeout_secs),
            )?)
        }
        EmbeddingProviderKind::FastEmbed => BoxEmbedder::new(FastEmbedEmbedder::new(
            &config.model,
            data_dir.join("models"),
        )?),
    };

    tracing::debug!(
        provider = %config.provider,
        model = embedder.model_name(),
        batch_size = config.batch_size,
        "embedding client ready"
    );
    Ok(EmbeddingClient::new(embedder)
        .with_batch_size(config.batch_size)
        .with_max_concurrency(config.max_concurrency))
}
