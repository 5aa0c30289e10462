use std::path::PathBuf;

use thiserror::Error;

use crate::llm::LlmError;

/// Provisioning errors. Fatal and never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    #[error("missing endpoint: {0}")]
    MissingEndpoint(String),

    #[error("transaction dataset not found at {}", .0.display())]
    MissingDataset(PathBuf),

    #[error("vector index not found at {}; run `lpilot rebuild` to build it", .0.display())]
    MissingIndex(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("unknown {kind} provider: '{name}'")]
    UnknownProvider { kind: &'static str, name: String },

    #[error(
        "index was built with embedding model '{index_model}' but the client uses '{client_model}'; rebuild the index"
    )]
    EmbeddingModelMismatch {
        index_model: String,
        client_model: String,
    },
}

/// Failures from the embedding service boundary.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding provider error: {0}")]
    Provider(String),

    #[error("embedding service returned no vectors for batch starting at {offset}")]
    EmptyBatch { offset: usize },

    #[error("embedding service returned {actual} vectors for {expected} inputs (batch starting at {offset})")]
    CountMismatch {
        offset: usize,
        expected: usize,
        actual: usize,
    },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("failed to initialize embedding model: {0}")]
    ModelInit(String),
}

/// Failures from the vector index and its persisted artifact.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("query vector has dimension {actual} but the index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("index is stale: {missing} indexed transaction(s) are not in the dataset (first: '{first}'); rebuild the index")]
    Stale { missing: usize, first: String },

    #[error("top_k of {requested} exceeds the maximum of {max}")]
    TopKTooLarge { requested: usize, max: usize },

    #[error("malformed index artifact: {0}")]
    Malformed(String),

    #[error("index io error: {0}")]
    Io(String),
}

/// Umbrella error for retrieval and answer operations.
#[derive(Debug, Error)]
pub enum CopilotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_index_is_actionable() {
        let err = ConfigError::MissingIndex(PathBuf::from("/tmp/idx.json"));
        let msg = err.to_string();
        assert!(msg.contains("/tmp/idx.json"));
        assert!(msg.contains("lpilot rebuild"));
    }

    #[test]
    fn test_count_mismatch_display() {
        let err = EmbeddingError::CountMismatch {
            offset: 64,
            expected: 64,
            actual: 63,
        };
        assert_eq!(
            err.to_string(),
            "embedding service returned 63 vectors for 64 inputs (batch starting at 64)"
        );
    }

    #[test]
    fn test_copilot_error_from_index_error() {
        let err: CopilotError = IndexError::DimensionMismatch {
            expected: 384,
            actual: 768,
        }
        .into();
        assert!(matches!(err, CopilotError::Index(_)));
        assert!(err.to_string().contains("384"));
    }

    #[test]
    fn test_model_mismatch_display() {
        let err = ConfigError::EmbeddingModelMismatch {
            index_model: "a".to_string(),
            client_model: "b".to_string(),
        };
        assert!(err.to_string().contains("'a'"));
        assert!(err.to_string().contains("'b'"));
    }
}
