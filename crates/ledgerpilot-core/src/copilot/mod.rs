//! Retrieval orchestrator.
//!
//! `Copilot` runs the query pipeline: rewrite the question, embed it, search
//! the index, resolve hits to transactions by key, and (for `answer`) ask the
//! generation model for a grounded reply. The served [`Corpus`] sits behind
//! an `RwLock<Arc<_>>`: a request clones the `Arc` once and works against
//! that snapshot, and [`Copilot::rebuild`] swaps in a fully built
//! replacement, so readers never observe a partial index.

pub mod corpus;
pub mod prompt;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use ledgerpilot_types::config::{CopilotConfig, DEFAULT_TOP_K, MAX_TOP_K};
use ledgerpilot_types::error::{ConfigError, CopilotError};
use ledgerpilot_types::index::IndexSummary;
use ledgerpilot_types::llm::{CompletionRequest, Message, MessageRole};
use ledgerpilot_types::transaction::{Transaction, TransactionKey};

use crate::embedding::EmbeddingClient;
use crate::index::{IndexStore, VectorIndex};
use crate::ledger::Ledger;
use crate::llm::box_provider::BoxLlmProvider;
use crate::projector::project;
use crate::rewrite::QueryRewriter;

pub use corpus::Corpus;
pub use prompt::{FALLBACK_ANSWER, GroundedPrompt};

/// External services the orchestrator calls, injected at construction.
pub struct CopilotDeps {
    pub embeddings: EmbeddingClient,
    pub llm: BoxLlmProvider,
}

/// Per-deployment knobs for retrieval and generation.
#[derive(Debug, Clone)]
pub struct CopilotSettings {
    pub top_k: usize,
    pub chat_model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Currency code for `$` shorthand in queries.
    pub currency: String,
    /// Domain glossary text included in every answer prompt.
    pub glossary: String,
}

impl Default for CopilotSettings {
    fn default() -> Self {
        Self::from_config(&CopilotConfig::default(), String::new())
    }
}

impl CopilotSettings {
    pub fn from_config(config: &CopilotConfig, glossary: String) -> Self {
        Self {
            top_k: config.retrieval.top_k.clamp(1, MAX_TOP_K),
            chat_model: config.generation.model.clone(),
            temperature: config.generation.temperature,
            max_tokens: config.generation.max_tokens,
            currency: config.retrieval.currency.clone(),
            glossary,
        }
    }

    /// Override `top_k`; zero means the default, and values are capped at
    /// [`MAX_TOP_K`].
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = if top_k == 0 {
            DEFAULT_TOP_K
        } else {
            top_k.min(MAX_TOP_K)
        };
        self
    }
}

/// A transaction resolved from an index hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedTransaction {
    pub key: TransactionKey,
    pub score: f32,
    pub transaction: Transaction,
}

/// Ranked hits plus the query actually embedded.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub hits: Vec<RetrievedTransaction>,
    pub rewritten: String,
}

/// A generated answer with the context it was grounded on.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub answer: String,
    pub hits: Vec<RetrievedTransaction>,
    pub rewritten: String,
}

/// Embed every ledger document and build a complete index.
///
/// Fails without producing anything if any embedding batch fails.
#[tracing::instrument(skip_all, fields(transactions = ledger.len()))]
pub async fn build_index(
    embeddings: &EmbeddingClient,
    ledger: &Ledger,
) -> Result<VectorIndex, CopilotError> {
    let (keys, documents): (Vec<TransactionKey>, Vec<String>) =
        ledger.documents().into_iter().unzip();
    let vectors = embeddings.embed(&documents).await?;

    let dimension = vectors
        .first()
        .map(Vec::len)
        .or(embeddings.dimension())
        .unwrap_or_default();
    let index = VectorIndex::build(
        embeddings.model_name(),
        dimension,
        keys.into_iter().zip(vectors).collect(),
        ledger.fingerprint(),
    )?;

    tracing::info!(count = index.len(), dimension, "index built");
    Ok(index)
}

pub struct Copilot {
    embeddings: EmbeddingClient,
    llm: BoxLlmProvider,
    rewriter: QueryRewriter,
    settings: CopilotSettings,
    corpus: RwLock<Arc<Corpus>>,
}

impl Copilot {
    /// Assemble a copilot over a validated corpus.
    ///
    /// Rejects an index built with a different embedding model than the one
    /// the client now uses.
    pub fn new(
        deps: CopilotDeps,
        corpus: Corpus,
        settings: CopilotSettings,
    ) -> Result<Self, CopilotError> {
        check_model(&deps.embeddings, corpus.index())?;
        Ok(Self {
            rewriter: QueryRewriter::new(settings.currency.clone()),
            embeddings: deps.embeddings,
            llm: deps.llm,
            settings,
            corpus: RwLock::new(Arc::new(corpus)),
        })
    }

    pub fn settings(&self) -> &CopilotSettings {
        &self.settings
    }

    /// Snapshot of the corpus currently being served.
    pub async fn corpus(&self) -> Arc<Corpus> {
        Arc::clone(&*self.corpus.read().await)
    }

    /// Rewrite, embed and search; hits come back best first.
    #[tracing::instrument(skip(self), fields(top_k = self.settings.top_k, hits = tracing::field::Empty))]
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, CopilotError> {
        let corpus = self.corpus().await;
        let rewritten = self.rewriter.rewrite(query);

        if corpus.index().is_empty() {
            tracing::Span::current().record("hits", 0);
            return Ok(SearchOutcome {
                hits: Vec::new(),
                rewritten,
            });
        }

        let query_vector = self.embeddings.embed_one(&rewritten).await?;
        let slots = corpus.index().search(&query_vector, self.settings.top_k)?;

        let hits: Vec<RetrievedTransaction> = slots
            .into_iter()
            .flatten()
            .filter_map(|hit| {
                let transaction = corpus.ledger().get(&hit.key)?.clone();
                Some(RetrievedTransaction {
                    key: hit.key,
                    score: hit.score,
                    transaction,
                })
            })
            .collect();

        tracing::Span::current().record("hits", hits.len());
        Ok(SearchOutcome { hits, rewritten })
    }

    /// Answer from retrieved transactions only.
    pub async fn answer(&self, query: &str) -> Result<String, CopilotError> {
        Ok(self.answer_with_context(query).await?.answer)
    }

    /// Like [`Copilot::answer`], also returning the retrieved context.
    ///
    /// With no hits the fallback sentence is returned without calling the
    /// generation model.
    #[tracing::instrument(name = "answer", skip(self), fields(model = %self.settings.chat_model))]
    pub async fn answer_with_context(&self, query: &str) -> Result<AnswerOutcome, CopilotError> {
        let SearchOutcome { hits, rewritten } = self.search(query).await?;
        if hits.is_empty() {
            tracing::debug!("no transactions retrieved; returning fallback");
            return Ok(AnswerOutcome {
                answer: FALLBACK_ANSWER.to_string(),
                hits,
                rewritten,
            });
        }

        let documents: Vec<String> = hits.iter().map(|h| project(&h.transaction)).collect();
        let request = CompletionRequest {
            model: self.settings.chat_model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: GroundedPrompt::user(
                    &self.settings.glossary,
                    &documents,
                    self.settings.top_k,
                    query,
                    &rewritten,
                ),
            }],
            system: Some(GroundedPrompt::system()),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
        };

        let response = self.llm.complete(&request).await?;
        tracing::debug!(
            provider = self.llm.name(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "answer generated"
        );

        Ok(AnswerOutcome {
            answer: response.content.trim().to_string(),
            hits,
            rewritten,
        })
    }

    /// Re-embed `ledger` and swap the new corpus in.
    ///
    /// The old corpus keeps serving until the new index is complete; on
    /// failure it stays in place.
    #[tracing::instrument(skip_all, fields(transactions = ledger.len()))]
    pub async fn rebuild(&self, ledger: Ledger) -> Result<IndexSummary, CopilotError> {
        let corpus = self.build_corpus(ledger).await?;
        Ok(self.swap(corpus).await)
    }

    /// Like [`Copilot::rebuild`], persisting the index before swapping.
    pub async fn rebuild_into<S: IndexStore>(
        &self,
        ledger: Ledger,
        store: &S,
        path: &Path,
    ) -> Result<IndexSummary, CopilotError> {
        let corpus = self.build_corpus(ledger).await?;
        store.save(path, corpus.index()).await?;
        Ok(self.swap(corpus).await)
    }

    async fn build_corpus(&self, ledger: Ledger) -> Result<Corpus, CopilotError> {
        let index = build_index(&self.embeddings, &ledger).await?;
        Ok(Corpus::new(ledger, index)?)
    }

    async fn swap(&self, corpus: Corpus) -> IndexSummary {
        let summary = corpus.index().summary();
        *self.corpus.write().await = Arc::new(corpus);
        tracing::info!(count = summary.count, "corpus swapped");
        summary
    }
}

fn check_model(embeddings: &EmbeddingClient, index: &VectorIndex) -> Result<(), ConfigError> {
    if index.model() != embeddings.model_name() {
        return Err(ConfigError::EmbeddingModelMismatch {
            index_model: index.model().to_string(),
            client_model: embeddings.model_name().to_string(),
        });
    }
    Ok(())
}
