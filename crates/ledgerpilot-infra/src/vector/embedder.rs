//! FastEmbed-based local embedding generator.
//!
//! Implements the `Embedder` trait from `ledgerpilot-core` with ONNX runtime
//! inference, so an index can be built and queried without a remote
//! embedding service. Inference runs on the blocking thread pool.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use ledgerpilot_core::embedding::Embedder;
use ledgerpilot_types::error::{ConfigError, EmbeddingError};

/// Local models the embedder knows by name, with their output width.
const KNOWN_MODELS: &[(&str, EmbeddingModel, usize)] = &[
    ("bge-small-en-v1.5", EmbeddingModel::BGESmallENV15, 384),
    ("bge-base-en-v1.5", EmbeddingModel::BGEBaseENV15, 768),
    ("all-minilm-l6-v2", EmbeddingModel::AllMiniLML6V2, 384),
];

/// Resolve a configured model name (case-insensitive, optional vendor
/// prefix such as `BAAI/`) to a fastembed model.
pub fn resolve_model(name: &str) -> Result<(&'static str, EmbeddingModel, usize), ConfigError> {
    let short = name.rsplit('/').next().unwrap_or(name).to_lowercase();
    KNOWN_MODELS
        .iter()
        .find(|(id, _, _)| *id == short)
        .map(|(id, model, dim)| (*id, model.clone(), *dim))
        .ok_or_else(|| ConfigError::UnknownProvider {
            kind: "fastembed model",
            name: name.to_string(),
        })
}

pub struct FastEmbedEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimension: usize,
}

impl FastEmbedEmbedder {
    /// Load (downloading on first use) the named model into `cache_dir`.
    pub fn new(model_name: &str, cache_dir: PathBuf) -> Result<Self, EmbeddingError> {
        let (id, model, dimension) =
            resolve_model(model_name).map_err(|e| EmbeddingError::ModelInit(e.to_string()))?;

        tracing::info!(model = id, cache = %cache_dir.display(), "loading local embedding model");
        let text_model = TextEmbedding::try_new(
            InitOptions::new(model)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::ModelInit(e.to_string()))?;

        Ok(Self {
            model: Arc::new(Mutex::new(text_model)),
            model_name: id.to_string(),
            dimension,
        })
    }
}

impl Embedder for FastEmbedEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let input = texts.to_vec();
        tokio::task::spawn_blocking(move || {
            model
                .lock()
                .map_err(|_| {
                    EmbeddingError::Provider("embedding model lock poisoned".to_string())
                })?
                .embed(input, None)
                .map_err(|e| EmbeddingError::Provider(format!("local embedding failed: {e}")))
        })
        .await
        .map_err(|e| EmbeddingError::Provider(format!("embedding task failed: {e}")))?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}
