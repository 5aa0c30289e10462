//! Filesystem layout and data loaders for Ledgerpilot.
//!
//! Everything lives under one data directory: `config.toml`, the
//! transaction dataset, the domain glossary, the persisted index and the
//! local model cache. Paths in [`PathsConfig`] are relative to it unless
//! absolute.

pub mod dataset;

use std::path::{Path, PathBuf};

use ledgerpilot_types::config::PathsConfig;

/// Resolved locations of every file Ledgerpilot reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub root: PathBuf,
    pub dataset: PathBuf,
    pub index: PathBuf,
    pub glossary: PathBuf,
}

impl DataLayout {
    pub fn new(root: &Path, paths: &PathsConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            dataset: root.join(&paths.dataset),
            index: root.join(&paths.index),
            glossary: root.join(&paths.glossary),
        }
    }

    /// Cache directory for downloaded local embedding models.
    pub fn models_dir(&self) -> PathBuf {
        self.root.join("models")
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `LEDGERPILOT_DATA_DIR` environment variable
/// 2. `~/.ledgerpilot`
/// 3. `./.ledgerpilot` when no home directory is known
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LEDGERPILOT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".ledgerpilot");
    }

    PathBuf::from(".ledgerpilot")
}
