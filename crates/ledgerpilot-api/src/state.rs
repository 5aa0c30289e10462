//! Application state wiring configuration, credentials and services together.
//!
//! AppState resolves the data directory, config file and credentials once;
//! commands then ask it for the pieces they need. Nothing is connected until
//! a command asks, so `total` works without any model credentials.

use std::path::PathBuf;

use anyhow::Context;

use ledgerpilot_core::copilot::{Copilot, CopilotDeps, CopilotSettings, Corpus};
use ledgerpilot_core::embedding::EmbeddingClient;
use ledgerpilot_core::index::{IndexStore, VectorIndex};
use ledgerpilot_core::ledger::Ledger;
use ledgerpilot_infra::config::load_config;
use ledgerpilot_infra::filesystem::dataset::{load_glossary, load_ledger};
use ledgerpilot_infra::filesystem::{DataLayout, resolve_data_dir};
use ledgerpilot_infra::llm::create_provider;
use ledgerpilot_infra::secret::Credentials;
use ledgerpilot_infra::vector::{FileIndexStore, create_embedding_client};
use ledgerpilot_types::config::CopilotConfig;

pub struct AppState {
    pub data_dir: PathBuf,
    pub layout: DataLayout,
    pub config: CopilotConfig,
    pub credentials: Credentials,
    pub store: FileIndexStore,
}

impl AppState {
    /// Resolve the data directory and load config and credentials.
    pub async fn init(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir.unwrap_or_else(resolve_data_dir);
        let config = load_config(&data_dir).await;
        let layout = DataLayout::new(&data_dir, &config.paths);
        tracing::debug!(data_dir = %data_dir.display(), "application state initialized");

        Ok(Self {
            data_dir,
            layout,
            config,
            credentials: Credentials::from_env(),
            store: FileIndexStore::new(),
        })
    }

    pub async fn ledger(&self) -> anyhow::Result<Ledger> {
        Ok(load_ledger(&self.layout.dataset, &self.config.retrieval.currency).await?)
    }

    pub fn embedding_client(&self) -> anyhow::Result<EmbeddingClient> {
        Ok(create_embedding_client(
            &self.config.embedding,
            &self.credentials,
            &self.data_dir,
        )?)
    }

    pub async fn index(&self) -> anyhow::Result<VectorIndex> {
        Ok(self.store.load(&self.layout.index).await?)
    }

    /// Wire a [`Copilot`] over the persisted index and current dataset.
    pub async fn copilot(&self, top_k: Option<usize>) -> anyhow::Result<Copilot> {
        let embeddings = self.embedding_client()?;
        let llm = create_provider(&self.config.generation, &self.credentials)?;

        let ledger = self.ledger().await?;
        let index = self.index().await?;
        let corpus = Corpus::new(ledger, index).context(
            "the index does not match the dataset; run `lpilot rebuild`",
        )?;

        let glossary = load_glossary(&self.layout.glossary).await;
        let mut settings = CopilotSettings::from_config(&self.config, glossary);
        if let Some(k) = top_k {
            settings = settings.with_top_k(k);
        }

        Ok(Copilot::new(CopilotDeps { embeddings, llm }, corpus, settings)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_with_explicit_data_dir() {
        let tmp = TempDir::new().unwrap();
        let state = AppState::init(Some(tmp.path().to_path_buf())).await.unwrap();
        assert_eq!(state.data_dir, tmp.path());
        assert_eq!(state.layout.dataset, tmp.path().join("transactions.json"));
        assert_eq!(state.config.paths, CopilotConfig::default().paths);
    }

    #[tokio::test]
    async fn test_ledger_missing_dataset_fails() {
        let tmp = TempDir::new().unwrap();
        let state = AppState::init(Some(tmp.path().to_path_buf())).await.unwrap();
        let err = state.ledger().await.unwrap_err();
        assert!(err.to_string().contains("transactions.json"));
    }

    #[tokio::test]
    async fn test_index_missing_points_to_rebuild() {
        let tmp = TempDir::new().unwrap();
        let state = AppState::init(Some(tmp.path().to_path_buf())).await.unwrap();
        let err = state.index().await.unwrap_err();
        assert!(err.to_string().contains("lpilot rebuild"));
    }
}
