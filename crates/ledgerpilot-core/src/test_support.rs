//! Deterministic doubles for the embedding and generation ports.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ledgerpilot_types::error::EmbeddingError;
use ledgerpilot_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, Usage,
};

use crate::embedding::Embedder;
use crate::llm::provider::LlmProvider;

/// FNV-1a, so bucket assignment is stable across runs and toolchains.
fn fnv1a(token: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in token.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

/// Bag-of-words hashing embedding: texts sharing tokens land close together.
pub(crate) fn hash_vector(text: &str, dimension: usize) -> Vec<f32> {
    let mut vector = vec![0.0_f32; dimension];
    for token in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '.')
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty())
    {
        let bucket = (fnv1a(token) % dimension as u64) as usize;
        vector[bucket] += 1.0;
    }
    vector
}

pub(crate) struct HashEmbedder {
    dimension: usize,
    model: String,
    batch_sizes: Arc<Mutex<Vec<usize>>>,
}

impl HashEmbedder {
    pub(crate) fn new(dimension: usize) -> Self {
        Self {
            dimension,
            model: "hash-bow".to_string(),
            batch_sizes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Shared log of every batch size this embedder received.
    pub(crate) fn batch_sizes(&self) -> Arc<Mutex<Vec<usize>>> {
        Arc::clone(&self.batch_sizes)
    }
}

impl Embedder for HashEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.batch_sizes.lock().unwrap().push(texts.len());
        Ok(texts
            .iter()
            .map(|t| hash_vector(t, self.dimension))
            .collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}

/// Hashing embedder that holds back batches by their first text, so
/// concurrent batches can be made to complete in any order.
pub(crate) struct StaggeredEmbedder {
    inner: HashEmbedder,
    delays: HashMap<String, Duration>,
    finished: Arc<Mutex<Vec<String>>>,
}

impl StaggeredEmbedder {
    pub(crate) fn new(dimension: usize) -> Self {
        Self {
            inner: HashEmbedder::new(dimension),
            delays: HashMap::new(),
            finished: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Delay any batch that starts with `first_text`.
    pub(crate) fn with_delay(mut self, first_text: &str, delay: Duration) -> Self {
        self.delays.insert(first_text.to_string(), delay);
        self
    }

    /// First text of each batch, in the order the batches came back.
    pub(crate) fn finished(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.finished)
    }
}

impl Embedder for StaggeredEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let first = texts.first().cloned().unwrap_or_default();
        if let Some(delay) = self.delays.get(&first) {
            tokio::time::sleep(*delay).await;
        }
        let vectors = self.inner.embed(texts).await;
        self.finished.lock().unwrap().push(first);
        vectors
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    fn dimension(&self) -> Option<usize> {
        self.inner.dimension()
    }
}

#[derive(Clone, Copy)]
pub(crate) enum Fault {
    /// Return one vector fewer than requested.
    DropLast,
    /// Return no vectors at all.
    Empty,
    /// Return a vector one element short for the marker text.
    Ragged,
    /// Fail the request outright.
    Unavailable,
}

/// Misbehaves on any batch containing the text `FAULT`.
pub(crate) struct FaultyEmbedder {
    dimension: usize,
    fault: Fault,
}

impl FaultyEmbedder {
    pub(crate) fn new(dimension: usize, fault: Fault) -> Self {
        Self { dimension, fault }
    }
}

impl Embedder for FaultyEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors: Vec<Vec<f32>> = texts
            .iter()
            .map(|t| hash_vector(t, self.dimension))
            .collect();
        let Some(marker) = texts.iter().position(|t| t == "FAULT") else {
            return Ok(vectors);
        };
        match self.fault {
            Fault::DropLast => {
                vectors.pop();
            }
            Fault::Empty => vectors.clear(),
            Fault::Ragged => {
                vectors[marker].pop();
            }
            Fault::Unavailable => {
                return Err(EmbeddingError::Provider("503 service unavailable".to_string()));
            }
        }
        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        "hash-bow"
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}

/// Generation double that answers with the retrieved context block, padded
/// with whitespace, and records every request it receives.
pub(crate) struct EchoProvider {
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl EchoProvider {
    pub(crate) fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn default_model(&self) -> &str {
        "echo-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let user = request
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let context: Vec<&str> = user
            .lines()
            .skip_while(|line| !line.starts_with("Retrieved transactions"))
            .skip(1)
            .take_while(|line| !line.is_empty())
            .collect();
        Ok(CompletionResponse {
            id: "echo-1".to_string(),
            content: format!("\n  From your records: {}  \n", context.join(" | ")),
            model: request.model.clone(),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        })
    }
}

pub(crate) struct FailingProvider;

impl LlmProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    fn default_model(&self) -> &str {
        "failing-model"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::Overloaded("try later".to_string()))
    }
}
