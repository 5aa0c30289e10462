//! Embedder for OpenAI-compatible `/embeddings` endpoints.
//!
//! Sends one request per batch it is handed and returns the raw vectors in
//! input order. Batch splitting, count validation and normalization are the
//! [`EmbeddingClient`](ledgerpilot_core::embedding::EmbeddingClient)'s job.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use ledgerpilot_core::embedding::Embedder;
use ledgerpilot_types::error::{ConfigError, EmbeddingError};

/// HTTP embeddings client. Does NOT derive Debug: default headers carry the key.
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimensions: Option<usize>,
}

impl OpenAiEmbedder {
    pub fn new(
        api_key: &SecretString,
        base_url: &str,
        model: &str,
        dimensions: Option<usize>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let key = api_key.expose_secret().trim();
        if key.is_empty() {
            return Err(ConfigError::MissingCredentials(
                "OPENAI_API_KEY is empty".to_string(),
            ));
        }
        if model.trim().is_empty() {
            return Err(ConfigError::Invalid("embedding model name is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| ConfigError::Invalid("API key is not a valid header value".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.to_string(),
            dimensions,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.dimensions,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::Provider(format!("embeddings request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(EmbeddingError::Provider(format!(
                "embeddings request failed ({status}): {body}"
            )));
        }

        let mut parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            EmbeddingError::Provider(format!("failed to parse embeddings response: {e}"))
        })?;
        parsed.data.sort_by_key(|entry| entry.index);

        Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> Option<usize> {
        self.dimensions
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
