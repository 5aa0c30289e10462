//! Persistence port for vector indexes.
//!
//! Implemented by `ledgerpilot-infra`. Loading a missing index is a
//! configuration problem, not an index fault, so the port speaks
//! [`CopilotError`].

use std::future::Future;
use std::path::Path;

use ledgerpilot_types::error::CopilotError;

use super::VectorIndex;

pub trait IndexStore: Send + Sync {
    /// Read and validate a previously saved index.
    fn load(&self, path: &Path) -> impl Future<Output = Result<VectorIndex, CopilotError>> + Send;

    /// Persist `index`. Readers must never observe a partially written file.
    fn save(
        &self,
        path: &Path,
        index: &VectorIndex,
    ) -> impl Future<Output = Result<(), CopilotError>> + Send;
}
