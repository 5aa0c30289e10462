//! Embedder trait for text-to-vector conversion.
//!
//! Defines the embedding service boundary. Implementations (OpenAI-compatible
//! HTTP, local fastembed models) live in ledgerpilot-infra. Implementations
//! return raw vectors; batching, validation and normalization belong to
//! [`super::client::EmbeddingClient`].

use ledgerpilot_types::error::EmbeddingError;

/// Trait for converting text into embedding vectors.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts.
    ///
    /// Must return one vector per input text, in input order.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;

    /// The model identifier (e.g., "BAAI/bge-en-icl").
    fn model_name(&self) -> &str;

    /// Output dimensionality, when known before the first call.
    fn dimension(&self) -> Option<usize>;
}
