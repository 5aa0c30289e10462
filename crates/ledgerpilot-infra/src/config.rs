//! Configuration loader for Ledgerpilot.
//!
//! Reads `config.toml` from the data directory (`~/.ledgerpilot/` in
//! production) into [`CopilotConfig`], then applies environment overrides.
//! Falls back to defaults when the file is missing or malformed.

use std::path::Path;

use ledgerpilot_types::config::CopilotConfig;

use crate::secret::env::{CHAT_MODEL_VAR, EMBED_MODEL_VAR, process_env};

/// Load configuration from `{data_dir}/config.toml`, with environment
/// overrides applied.
///
/// - If the file does not exist, starts from [`CopilotConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and starts from the default.
pub async fn load_config(data_dir: &Path) -> CopilotConfig {
    let mut config = load_config_file(data_dir).await;
    apply_env_overrides(&mut config, process_env);
    config
}

async fn load_config_file(data_dir: &Path) -> CopilotConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return CopilotConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return CopilotConfig::default();
        }
    };

    match toml::from_str::<CopilotConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            CopilotConfig::default()
        }
    }
}

/// Apply `EMBED_MODEL` and `CHAT_MODEL` from `lookup` over the file values.
pub fn apply_env_overrides(config: &mut CopilotConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(model) = lookup(EMBED_MODEL_VAR) {
        tracing::debug!(%model, "embedding model overridden by environment");
        config.embedding.model = model;
    }
    if let Some(model) = lookup(CHAT_MODEL_VAR) {
        tracing::debug!(%model, "chat model overridden by environment");
        config.generation.model = model;
    }
}
