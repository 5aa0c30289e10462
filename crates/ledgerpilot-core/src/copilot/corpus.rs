//! A ledger paired with the index built from it.

use std::collections::HashSet;

use ledgerpilot_types::error::IndexError;
use ledgerpilot_types::transaction::TransactionKey;

use crate::index::VectorIndex;
use crate::ledger::Ledger;

/// The read-only data a [`super::Copilot`] serves queries from.
///
/// Construction checks that every indexed key resolves to a ledger entry, so
/// search hits can be dereferenced without further checks.
#[derive(Debug)]
pub struct Corpus {
    ledger: Ledger,
    index: VectorIndex,
}

impl Corpus {
    pub fn new(ledger: Ledger, index: VectorIndex) -> Result<Self, IndexError> {
        let missing: Vec<&TransactionKey> = index
            .keys()
            .iter()
            .filter(|k| !ledger.contains(k))
            .collect();
        if let Some(first) = missing.first() {
            return Err(IndexError::Stale {
                missing: missing.len(),
                first: first.to_string(),
            });
        }

        let indexed: HashSet<&TransactionKey> = index.keys().iter().collect();
        let unindexed = ledger.iter().filter(|e| !indexed.contains(&e.key)).count();
        if unindexed > 0 {
            tracing::warn!(
                unindexed,
                "ledger has transactions the index does not cover; rebuild to include them"
            );
        } else if index.fingerprint() != ledger.fingerprint() {
            tracing::warn!("ledger contents changed since the index was built; rebuild to refresh");
        }

        Ok(Self { ledger, index })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}
