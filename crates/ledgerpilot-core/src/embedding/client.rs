//! Batching embedding client.
//!
//! `EmbeddingClient` sits between the orchestrator and a raw [`BoxEmbedder`]:
//! it splits input into fixed-size batches, dispatches up to
//! `max_concurrency` batches at once, reassembles the vectors in input order
//! and L2-normalizes them. Any batch that comes back empty, short, or with a
//! vector of the wrong width fails the whole call: a partially embedded
//! corpus is never returned.

use futures_util::stream::{self, StreamExt, TryStreamExt};

use ledgerpilot_types::config::DEFAULT_EMBEDDING_BATCH_SIZE;
use ledgerpilot_types::error::EmbeddingError;

use super::box_embedder::BoxEmbedder;

/// Added to the L2 norm so all-zero embeddings do not divide by zero.
pub const NORMALIZATION_EPSILON: f32 = 1e-8;

/// Scale a vector to unit length (`v / (||v|| + eps)`).
pub fn l2_normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm + NORMALIZATION_EPSILON;
    for x in &mut vector {
        *x /= denom;
    }
    vector
}

/// Order-preserving, batch-validating wrapper around an [`BoxEmbedder`].
pub struct EmbeddingClient {
    embedder: BoxEmbedder,
    batch_size: usize,
    max_concurrency: usize,
}

impl EmbeddingClient {
    /// Create a client with the default batch size (64) and sequential dispatch.
    pub fn new(embedder: BoxEmbedder) -> Self {
        Self {
            embedder,
            batch_size: DEFAULT_EMBEDDING_BATCH_SIZE,
            max_concurrency: 1,
        }
    }

    /// Override the per-request batch size (minimum 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Allow up to `max_concurrency` batches in flight (minimum 1).
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Model identifier of the underlying embedder.
    ///
    /// The index records this at build time; queries against an index built
    /// with another model are rejected.
    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Output dimensionality, when the embedder knows it up front.
    pub fn dimension(&self) -> Option<usize> {
        self.embedder.dimension()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Embed `texts` into unit-length vectors, one per input, in input order.
    #[tracing::instrument(
        name = "embed",
        skip(self, texts),
        fields(
            model = %self.model_name(),
            count = texts.len(),
            batches = texts.len().div_ceil(self.batch_size),
        )
    )]
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // Collected up front so the returned future stays `Send`.
        let batch_size = self.batch_size;
        let pending: Vec<_> = texts
            .chunks(batch_size)
            .enumerate()
            .map(|(i, chunk)| self.embed_batch(i * batch_size, chunk))
            .collect();
        let batches: Vec<Vec<Vec<f32>>> = stream::iter(pending)
            .buffered(self.max_concurrency)
            .try_collect()
            .await?;

        let vectors: Vec<Vec<f32>> = batches.into_iter().flatten().collect();
        self.check_dimensions(&vectors)?;

        Ok(vectors.into_iter().map(l2_normalize).collect())
    }

    /// Embed a single text (a one-item batch).
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or(EmbeddingError::EmptyBatch { offset: 0 })
    }

    async fn embed_batch(
        &self,
        offset: usize,
        chunk: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        tracing::debug!(offset, size = chunk.len(), "embedding batch");
        let vectors = self.embedder.embed(chunk).await?;
        if vectors.is_empty() {
            return Err(EmbeddingError::EmptyBatch { offset });
        }
        if vectors.len() != chunk.len() {
            return Err(EmbeddingError::CountMismatch {
                offset,
                expected: chunk.len(),
                actual: vectors.len(),
            });
        }
        Ok(vectors)
    }

    fn check_dimensions(&self, vectors: &[Vec<f32>]) -> Result<(), EmbeddingError> {
        let expected = match self.dimension() {
            Some(dim) => dim,
            None => vectors.first().map(Vec::len).unwrap_or_default(),
        };
        if expected == 0 {
            return Err(EmbeddingError::Provider(
                "embedding service returned zero-length vectors".to_string(),
            ));
        }
        match vectors.iter().find(|v| v.len() != expected) {
            Some(bad) => Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: bad.len(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::test_support::{Fault, FaultyEmbedder, HashEmbedder, StaggeredEmbedder};

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("transaction number {i} at merchant {}", i % 7)).collect()
    }

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    #[test]
    fn test_l2_normalize_unit_length() {
        let v = l2_normalize(vec![3.0, 4.0]);
        assert!((norm(&v) - 1.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector_stays_zero() {
        let v = l2_normalize(vec![0.0; 4]);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn test_embed_returns_unit_vectors_in_order() {
        let client = EmbeddingClient::new(BoxEmbedder::new(HashEmbedder::new(32)));
        let input = texts(10);
        let vectors = client.embed(&input).await.unwrap();
        assert_eq!(vectors.len(), 10);
        for (text, vector) in input.iter().zip(&vectors) {
            assert!((norm(vector) - 1.0).abs() < 1e-6);
            let expected = l2_normalize(crate::test_support::hash_vector(text, 32));
            assert_eq!(vector, &expected);
        }
    }

    #[tokio::test]
    async fn test_batching_is_order_transparent() {
        let input = texts(150);
        let single = EmbeddingClient::new(BoxEmbedder::new(HashEmbedder::new(16)))
            .with_batch_size(1_000);
        let batched = EmbeddingClient::new(BoxEmbedder::new(HashEmbedder::new(16)))
            .with_batch_size(64)
            .with_max_concurrency(3);

        let a = single.embed(&input).await.unwrap();
        let b = batched.embed(&input).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_out_of_order_batches_reassembled_in_input_order() {
        let input = texts(130);
        let single = EmbeddingClient::new(BoxEmbedder::new(HashEmbedder::new(16)))
            .with_batch_size(1_000);

        // Batches start at 0, 64 and 128; make them finish back to front.
        let staggered = StaggeredEmbedder::new(16)
            .with_delay(&input[0], Duration::from_millis(80))
            .with_delay(&input[64], Duration::from_millis(40));
        let finished = staggered.finished();
        let batched = EmbeddingClient::new(BoxEmbedder::new(staggered))
            .with_batch_size(64)
            .with_max_concurrency(3);

        let expected = single.embed(&input).await.unwrap();
        let actual = batched.embed(&input).await.unwrap();

        assert_eq!(
            *finished.lock().unwrap(),
            vec![input[128].clone(), input[64].clone(), input[0].clone()]
        );
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_embed_future_can_be_spawned() {
        let client = Arc::new(
            EmbeddingClient::new(BoxEmbedder::new(HashEmbedder::new(8))).with_max_concurrency(2),
        );
        let spawned = Arc::clone(&client);
        let handle = tokio::spawn(async move { spawned.embed(&texts(70)).await });
        let vectors = handle.await.unwrap().unwrap();
        assert_eq!(vectors.len(), 70);
    }

    #[tokio::test]
    async fn test_batches_respect_batch_size() {
        let embedder = HashEmbedder::new(8);
        let sizes = embedder.batch_sizes();
        let client = EmbeddingClient::new(BoxEmbedder::new(embedder));
        client.embed(&texts(130)).await.unwrap();
        let mut recorded = sizes.lock().unwrap().clone();
        recorded.sort_unstable();
        assert_eq!(recorded, vec![2, 64, 64]);
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let embedder = HashEmbedder::new(8);
        let sizes = embedder.batch_sizes();
        let client = EmbeddingClient::new(BoxEmbedder::new(embedder));
        assert!(client.embed(&[]).await.unwrap().is_empty());
        assert!(sizes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_short_batch_fails_whole_call() {
        let mut input = texts(100);
        input[70] = "FAULT".to_string();
        let client = EmbeddingClient::new(BoxEmbedder::new(FaultyEmbedder::new(
            8,
            Fault::DropLast,
        )));
        let err = client.embed(&input).await.unwrap_err();
        match err {
            EmbeddingError::CountMismatch {
                offset,
                expected,
                actual,
            } => {
                assert_eq!(offset, 64);
                assert_eq!(expected, 36);
                assert_eq!(actual, 35);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_fails_whole_call() {
        let mut input = texts(3);
        input[0] = "FAULT".to_string();
        let client = EmbeddingClient::new(BoxEmbedder::new(FaultyEmbedder::new(
            8,
            Fault::Empty,
        )));
        let err = client.embed(&input).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::EmptyBatch { offset: 0 }));
    }

    #[tokio::test]
    async fn test_ragged_dimension_fails() {
        let mut input = texts(4);
        input[2] = "FAULT".to_string();
        let client = EmbeddingClient::new(BoxEmbedder::new(FaultyEmbedder::new(
            8,
            Fault::Ragged,
        )));
        let err = client.embed(&input).await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 8,
                actual: 7
            }
        ));
    }

    #[tokio::test]
    async fn test_embed_one_and_model_name() {
        let client = EmbeddingClient::new(BoxEmbedder::new(
            HashEmbedder::new(12).with_model("hash-test"),
        ));
        assert_eq!(client.model_name(), "hash-test");
        assert_eq!(client.dimension(), Some(12));
        let v = client.embed_one("Shell fuel purchase").await.unwrap();
        assert_eq!(v.len(), 12);
        assert!((norm(&v) - 1.0).abs() < 1e-6);
    }
}
