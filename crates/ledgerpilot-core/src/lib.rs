//! Retrieval core for Ledgerpilot.
//!
//! Normalizes raw transaction records into a [`ledger::Ledger`], projects
//! them into text, embeds them through the [`embedding::Embedder`] port,
//! searches an exact inner-product [`index::VectorIndex`], and grounds
//! generated answers in what was retrieved ([`copilot::Copilot`]).
//!
//! This crate defines the ports (`Embedder`, `LlmProvider`, `IndexStore`)
//! that `ledgerpilot-infra` implements. It depends only on
//! `ledgerpilot-types` -- never on `ledgerpilot-infra` or any network/IO crate.

pub mod copilot;
pub mod embedding;
pub mod index;
pub mod ledger;
pub mod llm;
pub mod projector;
pub mod rewrite;

#[cfg(test)]
mod test_support;
