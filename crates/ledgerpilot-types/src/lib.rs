//! Shared domain types for Ledgerpilot.
//!
//! This crate contains the types passed between the retrieval core, the
//! infrastructure adapters and the CLI: canonical transaction records,
//! index artifacts, configuration, LLM request/response shapes and the
//! error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod index;
pub mod llm;
pub mod transaction;
