//! Exact inner-product vector index over unit vectors.
//!
//! Vectors are stored contiguously in build order, each tagged with the
//! [`TransactionKey`] it was embedded from, so a hit resolves to a
//! transaction by identifier rather than by position in some parallel list.
//! The index is immutable; a rebuild produces a new one.

pub mod store;

use chrono::Utc;

use ledgerpilot_types::config::MAX_TOP_K;
use ledgerpilot_types::error::IndexError;
use ledgerpilot_types::index::{INDEX_FORMAT_VERSION, IndexArtifact, IndexSummary};
use ledgerpilot_types::transaction::TransactionKey;

pub use store::IndexStore;

/// A single nearest-neighbour match.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    /// Build-order position of the vector.
    pub position: usize,
    pub key: TransactionKey,
    /// Inner product with the query (cosine similarity for unit vectors).
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct VectorIndex {
    model: String,
    dimension: usize,
    fingerprint: String,
    keys: Vec<TransactionKey>,
    /// Row-major, `keys.len() * dimension` values.
    data: Vec<f32>,
}

impl VectorIndex {
    /// Build an index from keyed vectors, all of width `dimension`.
    pub fn build(
        model: impl Into<String>,
        dimension: usize,
        entries: Vec<(TransactionKey, Vec<f32>)>,
        fingerprint: impl Into<String>,
    ) -> Result<Self, IndexError> {
        let mut keys = Vec::with_capacity(entries.len());
        let mut data = Vec::with_capacity(entries.len() * dimension);
        for (key, vector) in entries {
            if vector.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            keys.push(key);
            data.extend_from_slice(&vector);
        }
        Ok(Self {
            model: model.into(),
            dimension,
            fingerprint: fingerprint.into(),
            keys,
            data,
        })
    }

    /// Restore an index from its persisted form, validating its shape.
    pub fn from_artifact(artifact: IndexArtifact) -> Result<Self, IndexError> {
        if artifact.format_version != INDEX_FORMAT_VERSION {
            return Err(IndexError::Malformed(format!(
                "unsupported format version {} (expected {INDEX_FORMAT_VERSION})",
                artifact.format_version
            )));
        }
        if artifact.keys.len() != artifact.vectors.len() {
            return Err(IndexError::Malformed(format!(
                "{} keys but {} vectors",
                artifact.keys.len(),
                artifact.vectors.len()
            )));
        }
        let entries = artifact.keys.into_iter().zip(artifact.vectors).collect();
        Self::build(
            artifact.model,
            artifact.dimension,
            entries,
            artifact.fingerprint,
        )
        .map_err(|e| IndexError::Malformed(e.to_string()))
    }

    /// Persisted form of this index, stamped with the current time.
    pub fn to_artifact(&self) -> IndexArtifact {
        IndexArtifact {
            format_version: INDEX_FORMAT_VERSION,
            model: self.model.clone(),
            dimension: self.dimension,
            fingerprint: self.fingerprint.clone(),
            built_at: Utc::now(),
            keys: self.keys.clone(),
            vectors: self.vectors().map(<[f32]>::to_vec).collect(),
        }
    }

    /// Return exactly `k` slots, best first. Slots beyond the number of
    /// indexed vectors are `None`.
    ///
    /// Equal scores are ordered by build position, so results are
    /// reproducible across rebuilds of the same data. `k` above
    /// [`MAX_TOP_K`] is rejected.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Option<IndexHit>>, IndexError> {
        if k > MAX_TOP_K {
            return Err(IndexError::TopKTooLarge {
                requested: k,
                max: MAX_TOP_K,
            });
        }
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors()
            .enumerate()
            .map(|(i, v)| (i, dot(v, query)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut hits: Vec<Option<IndexHit>> = scored
            .into_iter()
            .take(k)
            .map(|(position, score)| {
                Some(IndexHit {
                    position,
                    key: self.keys[position].clone(),
                    score,
                })
            })
            .collect();
        hits.resize(k, None);
        Ok(hits)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn keys(&self) -> &[TransactionKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn summary(&self) -> IndexSummary {
        IndexSummary {
            count: self.len(),
            dimension: self.dimension,
            model: self.model.clone(),
            fingerprint: self.fingerprint.clone(),
        }
    }

    fn vectors(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on a zero width; an empty index has no rows anyway.
        self.data.chunks_exact(self.dimension.max(1))
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
