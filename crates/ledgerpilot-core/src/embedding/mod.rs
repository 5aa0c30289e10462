//! Text embedding: the `Embedder` port and the batching `EmbeddingClient`.

pub mod box_embedder;
pub mod client;
pub mod embedder;

pub use box_embedder::BoxEmbedder;
pub use client::{l2_normalize, EmbeddingClient, NORMALIZATION_EPSILON};
pub use embedder::Embedder;
