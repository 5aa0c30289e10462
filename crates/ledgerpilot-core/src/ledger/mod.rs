//! The in-memory transaction ledger.
//!
//! A [`Ledger`] is the normalized, key-addressable corpus the index is built
//! from and resolved against. It is immutable once constructed.

pub mod normalize;

use std::collections::HashMap;

use serde_json::Value;
use sha2::{Digest, Sha256};

use ledgerpilot_types::error::ConfigError;
use ledgerpilot_types::transaction::{LedgerTotal, Transaction, TotalsFilter, TransactionKey};

use crate::projector::project;

use self::normalize::{DEFAULT_CURRENCY, normalize_with_currency};

/// Field names that may hold the record array in an object-shaped dataset.
const RECORD_FIELDS: &[&str] = &["transactions", "records", "data", "items"];

/// Extract the raw record list from a parsed dataset document.
///
/// Accepts a bare array, or an object with a `transactions`, `records`,
/// `data` or `items` array, falling back to the first array-valued field.
pub fn dataset_records(document: Value) -> Result<Vec<Value>, ConfigError> {
    match document {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => {
            let field = RECORD_FIELDS
                .iter()
                .find(|f| map.get(**f).is_some_and(Value::is_array))
                .map(|f| (*f).to_string())
                .or_else(|| {
                    map.iter()
                        .find(|(_, v)| v.is_array())
                        .map(|(k, _)| k.clone())
                });
            match field.and_then(|f| map.remove(&f)) {
                Some(Value::Array(records)) => Ok(records),
                _ => Err(ConfigError::Invalid(
                    "dataset object has no array of transactions".to_string(),
                )),
            }
        }
        _ => Err(ConfigError::Invalid(
            "dataset must be a JSON array or an object containing one".to_string(),
        )),
    }
}

/// A normalized transaction together with its resolution key.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub key: TransactionKey,
    pub transaction: Transaction,
}

/// Normalized transactions in dataset order, addressable by key.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    by_key: HashMap<TransactionKey, usize>,
    currency: String,
}

impl Ledger {
    pub fn empty() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            ..Default::default()
        }
    }

    /// Normalize raw records assuming [`DEFAULT_CURRENCY`].
    pub fn from_records(records: Vec<Value>) -> Self {
        Self::from_records_in(records, DEFAULT_CURRENCY)
    }

    /// Normalize raw records, assigning each a unique key.
    ///
    /// The key is the record's identifier, `row-{position}` when it has none,
    /// and `{id}#{n}` for the n-th repeat of a duplicated identifier.
    pub fn from_records_in(records: Vec<Value>, default_currency: &str) -> Self {
        let mut entries = Vec::with_capacity(records.len());
        let mut by_key = HashMap::with_capacity(records.len());

        for (position, raw) in records.iter().enumerate() {
            let (transaction, _) = normalize_with_currency(raw, default_currency);
            let id = transaction.id.trim();
            let base = if id.is_empty() {
                tracing::debug!(position, "transaction has no identifier; using row key");
                format!("row-{position}")
            } else {
                id.to_string()
            };

            let mut key = TransactionKey::new(base.clone());
            let mut n = 1;
            while by_key.contains_key(&key) {
                n += 1;
                key = TransactionKey::new(format!("{base}#{n}"));
            }
            if n > 1 {
                tracing::warn!(id = %base, key = %key, "duplicate transaction identifier");
            }

            by_key.insert(key.clone(), entries.len());
            entries.push(LedgerEntry { key, transaction });
        }

        tracing::debug!(count = entries.len(), "ledger loaded");
        Self {
            entries,
            by_key,
            currency: default_currency.to_string(),
        }
    }

    /// Parse a dataset document (see [`dataset_records`]) into a ledger.
    pub fn from_document(document: Value, default_currency: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_records_in(dataset_records(document)?, default_currency))
    }

    pub fn get(&self, key: &TransactionKey) -> Option<&Transaction> {
        self.by_key
            .get(key)
            .map(|&i| &self.entries[i].transaction)
    }

    pub fn contains(&self, key: &TransactionKey) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Projected documents in ledger order, paired with their keys.
    pub fn documents(&self) -> Vec<(TransactionKey, String)> {
        self.entries
            .iter()
            .map(|e| (e.key.clone(), project(&e.transaction)))
            .collect()
    }

    /// Hex SHA-256 over every key and projected document, in order.
    ///
    /// Two ledgers with equal fingerprints embed to identical indexes.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (key, doc) in self.documents() {
            hasher.update(key.as_str().as_bytes());
            hasher.update(b"\n");
            hasher.update(doc.as_bytes());
            hasher.update(b"\n");
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// Sum signed amounts of the transactions matching `filter`.
    ///
    /// Transactions without an amount are skipped. When a date bound is set,
    /// transactions whose date cannot be parsed are excluded.
    pub fn total(&self, filter: &TotalsFilter) -> LedgerTotal {
        let mut sum = 0.0_f64;
        let mut matched = 0;

        for txn in self.entries.iter().map(|e| &e.transaction) {
            let Some(amount) = txn.amount else { continue };
            if filter.start.is_some() || filter.end.is_some() {
                let Some(date) = txn.booking_date() else { continue };
                if filter.start.is_some_and(|s| date < s) || filter.end.is_some_and(|e| date > e) {
                    continue;
                }
            }
            if filter
                .category
                .as_deref()
                .is_some_and(|c| !txn.category.eq_ignore_ascii_case(c))
            {
                continue;
            }
            if filter
                .kind
                .as_deref()
                .is_some_and(|k| !txn.kind.eq_ignore_ascii_case(k))
            {
                continue;
            }
            sum += amount;
            matched += 1;
        }

        LedgerTotal {
            total: (sum * 100.0).round() / 100.0,
            matched,
            currency: self.currency.clone(),
        }
    }
}
