//! Canonical transaction record types.
//!
//! Every dataset schema variant is normalized into [`Transaction`] before it
//! is projected, embedded or summed. Fields that the source record does not
//! carry are left empty rather than rejected.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable key used to resolve an index entry back to its transaction.
///
/// Normally the record's own identifier. Records without one get a
/// positional `row-{n}` key assigned at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionKey(pub String);

impl TransactionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single ledger transaction in canonical form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Source identifier (empty when the record carried none).
    pub id: String,
    /// Booking timestamp as it appeared in the source, usually `YYYY-MM-DD`.
    pub date: String,
    /// Signed amount: negative for money leaving the account.
    pub amount: Option<f64>,
    /// ISO currency code.
    pub currency: String,
    /// Merchant or counterparty name.
    pub counterparty: String,
    pub category: String,
    /// Transaction type (e.g. `PURCHASE`, `PAYMENT`).
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub recurring: Option<bool>,
    pub notes: String,
}

impl Transaction {
    /// Calendar date of the booking, if the timestamp starts with an ISO date.
    pub fn booking_date(&self) -> Option<NaiveDate> {
        let head = self.date.trim().get(..10)?;
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }
}

/// Filter for summing ledger amounts.
///
/// All bounds are inclusive; string matches are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub category: Option<String>,
    pub kind: Option<String>,
}

/// Result of summing ledger amounts under a [`TotalsFilter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTotal {
    /// Sum of matching signed amounts, rounded to cents.
    pub total: f64,
    /// Number of transactions that matched the filter.
    pub matched: usize,
    pub currency: String,
}
