//! Configuration types for Ledgerpilot.
//!
//! `CopilotConfig` represents the optional `config.toml` in the data
//! directory. Every field has a default so an empty file (or no file at all)
//! yields a working configuration once credentials are supplied through the
//! environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum number of texts sent in one embedding request.
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 64;

/// Number of transactions retrieved per query.
pub const DEFAULT_TOP_K: usize = 8;

/// Upper bound on slots requested from the index in one search.
pub const MAX_TOP_K: usize = 100;

pub const DEFAULT_EMBED_MODEL: &str = "BAAI/bge-en-icl";
pub const DEFAULT_CHAT_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopilotConfig {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Which embedding backend produces vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// Any OpenAI-compatible `/embeddings` endpoint.
    #[serde(rename = "openai")]
    OpenAi,
    /// Local ONNX inference through fastembed.
    FastEmbed,
}

impl fmt::Display for EmbeddingProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingProviderKind::OpenAi => write!(f, "openai"),
            EmbeddingProviderKind::FastEmbed => write!(f, "fastembed"),
        }
    }
}

impl FromStr for EmbeddingProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(EmbeddingProviderKind::OpenAi),
            "fastembed" => Ok(EmbeddingProviderKind::FastEmbed),
            other => Err(format!("invalid embedding provider: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_provider")]
    pub provider: EmbeddingProviderKind,
    #[serde(default = "default_embed_model")]
    pub model: String,
    /// Overrides the OpenAI-compatible base URL for embeddings only.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Requested output dimensionality, for models that support truncation.
    #[serde(default)]
    pub dimensions: Option<usize>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Batches in flight at once during an index build.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Per-request timeout for the embedding service.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embed_model(),
            base_url: None,
            dimensions: None,
            batch_size: default_batch_size(),
            max_concurrency: default_max_concurrency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            base_url: None,
            temperature: 0.0,
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Currency code substituted for `$` shorthand in queries.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            currency: default_currency(),
        }
    }
}

/// Dataset, index and glossary locations. Relative paths resolve against
/// the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_dataset_path")]
    pub dataset: PathBuf,
    #[serde(default = "default_index_path")]
    pub index: PathBuf,
    #[serde(default = "default_glossary_path")]
    pub glossary: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset_path(),
            index: default_index_path(),
            glossary: default_glossary_path(),
        }
    }
}

fn default_embedding_provider() -> EmbeddingProviderKind {
    EmbeddingProviderKind::OpenAi
}

fn default_embed_model() -> String {
    DEFAULT_EMBED_MODEL.to_string()
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_EMBEDDING_BATCH_SIZE
}

fn default_max_concurrency() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("transactions.json")
}

fn default_index_path() -> PathBuf {
    PathBuf::from("index").join("transactions.index.json")
}

fn default_glossary_path() -> PathBuf {
    PathBuf::from("domain_glossary.yaml")
}
