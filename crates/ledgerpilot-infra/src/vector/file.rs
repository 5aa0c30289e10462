//! JSON file store for vector indexes.
//!
//! The artifact is written to a temporary sibling file and renamed over the
//! target, so a reader sees either the previous index or the new one.

use std::path::Path;

use ledgerpilot_core::index::{IndexStore, VectorIndex};
use ledgerpilot_types::error::{ConfigError, CopilotError, IndexError};
use ledgerpilot_types::index::IndexArtifact;

#[derive(Debug, Clone, Copy, Default)]
pub struct FileIndexStore;

impl FileIndexStore {
    pub fn new() -> Self {
        Self
    }
}

impl IndexStore for FileIndexStore {
    async fn load(&self, path: &Path) -> Result<VectorIndex, CopilotError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::MissingIndex(path.to_path_buf()).into());
            }
            Err(err) => {
                return Err(IndexError::Io(format!("{}: {err}", path.display())).into());
            }
        };

        let artifact: IndexArtifact = serde_json::from_slice(&bytes)
            .map_err(|e| IndexError::Malformed(format!("{}: {e}", path.display())))?;
        tracing::debug!(
            path = %path.display(),
            count = artifact.keys.len(),
            model = %artifact.model,
            built_at = %artifact.built_at,
            "index loaded"
        );
        Ok(VectorIndex::from_artifact(artifact)?)
    }

    async fn save(&self, path: &Path, index: &VectorIndex) -> Result<(), CopilotError> {
        let io = |e: std::io::Error| IndexError::Io(format!("{}: {e}", path.display()));

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io)?;
        }

        let json = serde_json::to_vec(&index.to_artifact())
            .map_err(|e| IndexError::Malformed(e.to_string()))?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = Path::new(&tmp_name);

        tokio::fs::write(tmp, &json).await.map_err(io)?;
        if let Err(err) = tokio::fs::rename(tmp, path).await {
            let _ = tokio::fs::remove_file(tmp).await;
            return Err(io(err).into());
        }

        tracing::info!(path = %path.display(), count = index.len(), "index saved");
        Ok(())
    }
}
