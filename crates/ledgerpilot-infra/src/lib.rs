//! Infrastructure layer for Ledgerpilot.
//!
//! Contains implementations of the traits defined in `ledgerpilot-core`:
//! remote and local embedders, the OpenAI-compatible generation provider,
//! the JSON index store, plus configuration loading, credential resolution
//! and dataset/glossary loaders.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod secret;
pub mod vector;
