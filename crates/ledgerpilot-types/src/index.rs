//! Persisted vector index shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::transaction::TransactionKey;

/// Current on-disk format version of [`IndexArtifact`].
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Serialized form of a flat inner-product index.
///
/// `keys[i]` names the transaction whose projection produced `vectors[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexArtifact {
    pub format_version: u32,
    /// Embedding model identifier used at build time.
    pub model: String,
    pub dimension: usize,
    /// SHA-256 of the projected dataset the index was built from.
    pub fingerprint: String,
    pub built_at: DateTime<Utc>,
    pub keys: Vec<TransactionKey>,
    pub vectors: Vec<Vec<f32>>,
}

/// Summary reported after an index build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub count: usize,
    pub dimension: usize,
    pub model: String,
    pub fingerprint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_serde_preserves_vectors_exactly() {
        let artifact = IndexArtifact {
            format_version: INDEX_FORMAT_VERSION,
            model: "BAAI/bge-en-icl".to_string(),
            dimension: 3,
            fingerprint: "abc".to_string(),
            built_at: Utc::now(),
            keys: vec![TransactionKey::from("T1")],
            vectors: vec![vec![0.267_261_24, 0.534_522_5, 0.801_783_7]],
        };
        let json = serde_json::to_string(&artifact).unwrap();
        let parsed: IndexArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.keys, artifact.keys);
        for (a, b) in parsed.vectors[0].iter().zip(&artifact.vectors[0]) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}
