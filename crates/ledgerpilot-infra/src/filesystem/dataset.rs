//! Loaders for the transaction dataset and the domain glossary.

use std::path::Path;

use ledgerpilot_core::ledger::Ledger;
use ledgerpilot_types::error::ConfigError;

/// Read and normalize the transaction dataset at `path`.
///
/// `currency` is assumed for records that do not name one.
pub async fn load_ledger(path: &Path, currency: &str) -> Result<Ledger, ConfigError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::MissingDataset(path.to_path_buf()));
        }
        Err(err) => {
            return Err(ConfigError::Invalid(format!(
                "failed to read {}: {err}",
                path.display()
            )));
        }
    };

    let document: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
        ConfigError::Invalid(format!("{} is not valid JSON: {e}", path.display()))
    })?;
    let ledger = Ledger::from_document(document, currency)?;
    tracing::info!(path = %path.display(), transactions = ledger.len(), "dataset loaded");
    Ok(ledger)
}

/// Read the glossary text. A missing glossary is empty, not an error.
pub async fn load_glossary(path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No glossary at {}, continuing without one", path.display());
            String::new()
        }
        Err(err) => {
            tracing::warn!("Failed to read glossary {}: {err}", path.display());
            String::new()
        }
    }
}
